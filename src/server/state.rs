use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::notification::{EmailPipeline, EmailSender};
use crate::template::TemplateService;
use crate::triggers::EventSubscriber;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub templates: TemplateService,
    pub pipeline: Arc<EmailPipeline>,
    pub subscriber: Arc<EventSubscriber>,
    pub started_at: Instant,
}

impl AppState {
    /// Wire the bootstrapped template service to a sender
    pub fn new(settings: Settings, templates: TemplateService, sender: Arc<dyn EmailSender>) -> Self {
        let pipeline = Arc::new(
            EmailPipeline::new(templates.clone(), sender)
                .with_default_from(settings.email.default_from.clone()),
        );
        let subscriber = Arc::new(
            EventSubscriber::new(pipeline.clone())
                .with_public_url(settings.email.public_url.clone()),
        );

        Self {
            settings: Arc::new(settings),
            templates,
            pipeline,
            subscriber,
            started_at: Instant::now(),
        }
    }

    /// Replace the event subscriber (e.g. to wire in an invoice generator)
    pub fn with_subscriber(mut self, subscriber: EventSubscriber) -> Self {
        self.subscriber = Arc::new(subscriber);
        self
    }
}

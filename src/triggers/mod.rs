//! Event triggers
//!
//! Commerce events arrive over HTTP and are routed to the subscriber that
//! renders and sends the matching email:
//! - `order.placed` -> `order-placed`
//! - `auth.password_reset` -> `auth-password-reset`
//! - `invite.created` -> `auth-invite`

mod events;
mod http;
mod subscriber;

pub use events::{
    CommerceEvent, EventOutcome, InviteCreatedPayload, OrderPlacedPayload, PasswordResetPayload,
    AUTH_PASSWORD_RESET, INVITE_CREATED, ORDER_PLACED,
};
pub use http::{receive_event, EventResponse};
pub use subscriber::{EventSubscriber, InvoiceGenerator, SubscriberError};

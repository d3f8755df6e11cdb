//! Template key derivation from file names

/// Normalize a file stem into a template key.
///
/// `camelCase` boundaries and runs of whitespace or underscores become `-`,
/// and the result is lowercased: `"MyTemplate_Name"` becomes
/// `"my-template-name"`. Applying it to its own output is a no-op.
pub fn normalize_key(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    let mut chars = name.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() || c == '_' {
            let is_space = c.is_whitespace();
            while chars
                .peek()
                .is_some_and(|&n| if is_space { n.is_whitespace() } else { n == '_' })
            {
                chars.next();
            }
            out.push('-');
            prev = Some(c);
            continue;
        }

        if c.is_ascii_uppercase() && prev.is_some_and(|p| p.is_ascii_lowercase()) {
            out.push('-');
        }

        out.push(c);
        prev = Some(c);
    }

    out.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_and_snake_case() {
        assert_eq!(normalize_key("MyTemplate_Name"), "my-template-name");
        assert_eq!(normalize_key("Auth_Invite"), "auth-invite");
        assert_eq!(normalize_key("orderPlaced"), "order-placed");
    }

    #[test]
    fn test_already_kebab_case() {
        assert_eq!(normalize_key("order-placed"), "order-placed");
        assert_eq!(normalize_key("foo"), "foo");
    }

    #[test]
    fn test_case_only_differences_collide() {
        assert_eq!(normalize_key("Foo"), normalize_key("foo"));
    }

    #[test]
    fn test_separator_runs() {
        assert_eq!(normalize_key("order   placed"), "order-placed");
        assert_eq!(normalize_key("order__placed"), "order-placed");
        assert_eq!(normalize_key("order_ placed"), "order--placed");
    }

    #[test]
    fn test_uppercase_runs_are_not_split() {
        assert_eq!(normalize_key("HTMLEmail"), "htmlemail");
        assert_eq!(normalize_key("sendPDFInvoice"), "send-pdfinvoice");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = [
            "MyTemplate_Name",
            "Auth_Invite",
            "order placed",
            "aBcD",
            "already-normal",
            "Mixed_Case Name__here",
            "",
        ];

        for input in inputs {
            let once = normalize_key(input);
            assert_eq!(normalize_key(&once), once, "input: {input:?}");
        }
    }
}

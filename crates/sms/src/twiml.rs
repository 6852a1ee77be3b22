use std::fmt;

pub const TWIML_CONTENT_TYPE: &str = "application/xml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// A TwiML messaging response: zero or more `<Message>` verbs wrapped in
/// `<Response>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessagingResponse {
    messages: Vec<String>,
}

impl MessagingResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, body: impl Into<String>) -> Self {
        self.messages.push(body.into());
        self
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MessagingResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(XML_DECLARATION)?;
        if self.messages.is_empty() {
            return f.write_str("<Response />");
        }
        f.write_str("<Response>")?;
        for message in &self.messages {
            write!(f, "<Message>{}</Message>", escape_xml(message))?;
        }
        f.write_str("</Response>")
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_xml, MessagingResponse};

    #[test]
    fn single_message_is_wrapped_in_response() {
        let xml = MessagingResponse::new().message("*Green Leaf Cafe*\n- Salad\n").render();

        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>*Green Leaf Cafe*\n- Salad\n</Message></Response>"
        );
    }

    #[test]
    fn markup_characters_are_escaped() {
        assert_eq!(escape_xml(r#"Mac & Cheese <"large">"#), "Mac &amp; Cheese &lt;&quot;large&quot;&gt;");
        assert_eq!(escape_xml("Joe's"), "Joe&apos;s");
    }

    #[test]
    fn empty_response_is_self_closing() {
        assert!(MessagingResponse::new().render().ends_with("<Response />"));
    }
}

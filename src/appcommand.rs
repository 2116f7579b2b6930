use quick_xml::escape::escape;

use crate::error::{AvrError, Result};
use crate::xml::element_text;

/// Path of the structured AppCommand endpoint
pub const APPCOMMAND_PATH: &str = "/goform/AppCommand0300.xml";

/// Parameter of an AppCommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCommandParam {
    /// Parameter name, e.g. `dynamiceq`
    pub name: String,
    /// Parameter value, escaped when the body is built
    pub text: String,
}

/// A single command for the AppCommand endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCommand {
    /// Command name, e.g. `SetAudyssey`
    pub name: String,
    pub params: Vec<AppCommandParam>,
}

impl AppCommand {
    /// Create a new command with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.params.push(AppCommandParam {
            name: name.into(),
            text: text.into(),
        });
        self
    }

    /// Render a request body carrying only this command
    pub fn to_xml(&self) -> String {
        request_body(std::slice::from_ref(self))
    }

    fn write_cmd(&self, xml: &mut String) {
        xml.push_str(r#"<cmd id="3">"#);
        xml.push_str(&format!("<name>{}</name>", escape(self.name.as_str())));
        if !self.params.is_empty() {
            xml.push_str("<list>");
            for param in &self.params {
                xml.push_str(&format!(
                    r#"<param name="{}">{}</param>"#,
                    escape(param.name.as_str()),
                    escape(param.text.as_str())
                ));
            }
            xml.push_str("</list>");
        }
        xml.push_str("</cmd>");
    }

    /// Check the receiver acknowledged this command
    ///
    /// The endpoint answers `<rx><cmd>OK</cmd></rx>` on success.
    pub fn check_response(&self, body: &str) -> Result<()> {
        let failed = || AvrError::AppCommandFailed {
            name: self.name.clone(),
        };
        match element_text(body, "cmd") {
            Ok(Some(text)) if text == "OK" => Ok(()),
            Ok(_) => Err(failed()),
            Err(e) => {
                tracing::debug!("Unreadable AppCommand response: {}", e);
                Err(failed())
            }
        }
    }
}

/// Render the request body for a batch of commands
pub fn request_body(commands: &[AppCommand]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="utf-8"?><tx>"#);
    for command in commands {
        command.write_cmd(&mut xml);
    }
    xml.push_str("</tx>");
    xml
}

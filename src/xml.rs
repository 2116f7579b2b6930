use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{AvrError, Result};

/// Text of the first `<tag>` element in `xml`
///
/// Returns `Ok(None)` when the element does not occur and an empty string for
/// an empty element.
pub(crate) fn element_text(xml: &str, tag: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut inside = false;
    loop {
        let event = reader
            .read_event()
            .map_err(|e| AvrError::Xml(e.to_string()))?;
        match event {
            Event::Start(e) if !inside && e.name().as_ref() == tag.as_bytes() => inside = true,
            Event::Empty(e) if !inside && e.name().as_ref() == tag.as_bytes() => {
                return Ok(Some(String::new()))
            }
            Event::Text(text) if inside => {
                let text = text.unescape().map_err(|e| AvrError::Xml(e.to_string()))?;
                return Ok(Some(text.into_owned()));
            }
            Event::Start(_) | Event::End(_) if inside => return Ok(Some(String::new())),
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_text() {
        let xml = "<Device_Info><ModelName>AVR-X3800H</ModelName><BrandCode>0</BrandCode></Device_Info>";
        assert_eq!(element_text(xml, "ModelName").unwrap().as_deref(), Some("AVR-X3800H"));
        assert_eq!(element_text(xml, "BrandCode").unwrap().as_deref(), Some("0"));
        assert_eq!(element_text(xml, "Missing").unwrap(), None);
    }

    #[test]
    fn test_element_text_empty_and_escaped() {
        assert_eq!(element_text("<rx><cmd/></rx>", "cmd").unwrap().as_deref(), Some(""));
        assert_eq!(element_text("<rx><cmd></cmd></rx>", "cmd").unwrap().as_deref(), Some(""));
        assert_eq!(
            element_text("<a><b>L&amp;R</b></a>", "b").unwrap().as_deref(),
            Some("L&R")
        );
    }

    #[test]
    fn test_element_text_malformed() {
        assert!(element_text("<a><b>text</c></a>", "x").is_err());
    }
}

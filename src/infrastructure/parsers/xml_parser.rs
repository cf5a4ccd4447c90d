use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{error, info};
use crate::domain::error::IngestionError;

// One document per child element of the root; leaf elements become string
// fields, nested text is flattened into its field.
pub fn parse_xml(bytes: &[u8]) -> Result<Vec<serde_json::Value>, IngestionError> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut documents = Vec::new();
    let mut record: Option<serde_json::Map<String, serde_json::Value>> = None;
    let mut field: Option<String> = None;
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                if depth == 2 {
                    record = Some(serde_json::Map::new());
                } else if depth == 3 {
                    field = Some(String::from_utf8_lossy(e.local_name().as_ref()).to_string());
                    text.clear();
                }
            }
            Ok(Event::Empty(e)) => {
                if depth == 2 {
                    if let Some(rec) = record.as_mut() {
                        let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                        rec.insert(name, serde_json::Value::Null);
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if field.is_some() {
                    let unescaped = e.unescape().map_err(|err| {
                        error!("Failed to unescape XML text: {}", err);
                        IngestionError::Parse(err.to_string())
                    })?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::End(_)) => {
                if depth == 3 {
                    if let (Some(rec), Some(name)) = (record.as_mut(), field.take()) {
                        let value = if text.is_empty() {
                            serde_json::Value::Null
                        } else {
                            serde_json::Value::String(text.clone())
                        };
                        rec.insert(name, value);
                    }
                } else if depth == 2 {
                    if let Some(rec) = record.take() {
                        documents.push(serde_json::Value::Object(rec));
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                error!("XML parse error at position {}: {}", reader.buffer_position(), e);
                return Err(IngestionError::Parse(e.to_string()));
            }
        }
        buf.clear();
    }

    info!("Parsed {} records from XML", documents.len());
    Ok(documents)
}

//! Mapping between page units and Qdrant point payloads.
//!
//! Decoding is lenient: a missing or mistyped key yields an absent metadata field.

use std::collections::HashMap;

use qdrant_client::qdrant::{ScoredPoint, Value, value::Kind};

use regwise_domain::{
	document::{DocumentMetadata, DocumentType},
	page::PageUnit,
	provenance::RetrievalMatch,
};

pub const TEXT_KEY: &str = "text";
pub const DOC_ID_KEY: &str = "doc_id";
pub const FILE_NAME_KEY: &str = "file_name";
pub const PAGE_NUMBER_KEY: &str = "page_number";
pub const DOCUMENT_TYPE_KEY: &str = "document_type";

pub fn entry_payload(unit: &PageUnit) -> HashMap<String, Value> {
	let mut payload = HashMap::new();

	payload.insert(TEXT_KEY.to_string(), Value::from(unit.text.clone()));
	payload.insert(DOC_ID_KEY.to_string(), Value::from(unit.doc_id.clone()));
	payload.insert(FILE_NAME_KEY.to_string(), Value::from(unit.file_name.clone()));
	payload.insert(PAGE_NUMBER_KEY.to_string(), Value::from(unit.page_number as i64));
	payload
		.insert(DOCUMENT_TYPE_KEY.to_string(), Value::from(unit.document_type.as_str().to_string()));

	payload
}

pub fn decode_match(point: &ScoredPoint) -> RetrievalMatch {
	let payload = &point.payload;
	let metadata = DocumentMetadata::new(
		payload_string(payload, DOC_ID_KEY),
		payload_string(payload, FILE_NAME_KEY),
		payload_u32(payload, PAGE_NUMBER_KEY),
		payload_string(payload, DOCUMENT_TYPE_KEY).and_then(|raw| DocumentType::parse(&raw)),
	);

	RetrievalMatch {
		text: payload_string(payload, TEXT_KEY).unwrap_or_default(),
		metadata,
		score: point.score,
	}
}

fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	match &payload.get(key)?.kind {
		Some(Kind::StringValue(text)) => Some(text.clone()),
		_ => None,
	}
}

fn payload_u32(payload: &HashMap<String, Value>, key: &str) -> Option<u32> {
	match &payload.get(key)?.kind {
		Some(Kind::IntegerValue(value)) => u32::try_from(*value).ok(),
		Some(Kind::DoubleValue(value)) =>
			if value.fract() == 0.0 {
				u32::try_from(*value as i64).ok()
			} else {
				None
			},
		Some(Kind::StringValue(text)) => text.trim().parse().ok(),
		_ => None,
	}
}

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
	Pdf,
	Docx,
	Html,
	Unknown,
}
impl DocumentType {
	/// Maps the file name's extension (text after the last dot, case-insensitive).
	pub fn from_file_name(file_name: &str) -> Self {
		let extension = file_name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or(file_name);

		Self::from_extension(extension)
	}

	pub fn from_extension(extension: &str) -> Self {
		match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
			"pdf" => Self::Pdf,
			"docx" => Self::Docx,
			"html" | "htm" => Self::Html,
			_ => Self::Unknown,
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"PDF" => Some(Self::Pdf),
			"DOCX" => Some(Self::Docx),
			"HTML" => Some(Self::Html),
			"UNKNOWN" => Some(Self::Unknown),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Pdf => "PDF",
			Self::Docx => "DOCX",
			Self::Html => "HTML",
			Self::Unknown => "UNKNOWN",
		}
	}
}

impl fmt::Display for DocumentType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Document identity attached to a stored entry.
///
/// Every field is optional because entries read back from the vector store may predate a field
/// or carry a malformed value. Construction drops blank strings and page numbers below 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
	pub doc_id: Option<String>,
	pub file_name: Option<String>,
	pub page_number: Option<u32>,
	pub document_type: Option<DocumentType>,
}
impl DocumentMetadata {
	pub fn new(
		doc_id: Option<String>,
		file_name: Option<String>,
		page_number: Option<u32>,
		document_type: Option<DocumentType>,
	) -> Self {
		Self {
			doc_id: non_blank(doc_id),
			file_name: non_blank(file_name),
			page_number: page_number.filter(|page| *page >= 1),
			document_type,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.doc_id.is_none()
			&& self.file_name.is_none()
			&& self.page_number.is_none()
			&& self.document_type.is_none()
	}
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.trim().is_empty())
}

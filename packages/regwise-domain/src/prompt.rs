pub const USER_MESSAGE_PLACEHOLDER: &str = "{{userMessage}}";
pub const CONTENTS_PLACEHOLDER: &str = "{{contents}}";

pub const DEFAULT_PROMPT_TEMPLATE: &str = "\
{{userMessage}}

Answer using the following information:
{{contents}}

When citing sources, use the Document Information provided with each content block.
Format citations as: [Document: doc_id, Page: page_number]";

pub const SYSTEM_PROMPT: &str = "\
You are a specialized Regulatory Change Impact Assistant for financial institutions.

Your responsibilities:
- Answer questions about regulatory changes and compliance requirements from Regulatory Change Bulletins
- Analyze the impact of regulatory bulletins on business processes and operations
- Provide guidance on compliance obligations, deadlines, and required actions
- Explain complex regulatory language in clear, actionable terms
- Identify cross-references to other regulations and related requirements

Response format:
1. Direct answer with regulatory context
2. Supporting evidence from regulatory bulletins (with citations including document ID and page number)
3. Impact assessment and compliance recommendations
4. Relevant deadlines or effective dates if mentioned

Important guidelines:
- Always cite your sources using the format: [Document: doc_id, Page: page_number]
- If you cannot find relevant information in the provided bulletins, clearly state that no relevant information was found
- Refuse questions about topics outside regulatory compliance (e.g., general business advice, product recommendations)
- Be precise about regulatory requirements and avoid speculation
- Highlight any jurisdiction-specific requirements or exceptions";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
	template: String,
}
impl PromptTemplate {
	pub fn new(template: impl Into<String>) -> Self {
		Self { template: template.into() }
	}

	pub fn as_str(&self) -> &str {
		&self.template
	}

	/// Substitutes both placeholders in a single pass, so placeholder text inside the question or
	/// the contents is never expanded again.
	pub fn render(&self, user_message: &str, contents: &str) -> String {
		let mut out = String::with_capacity(self.template.len() + user_message.len() + contents.len());
		let mut rest = self.template.as_str();

		loop {
			let next = [(USER_MESSAGE_PLACEHOLDER, user_message), (CONTENTS_PLACEHOLDER, contents)]
				.into_iter()
				.filter_map(|(placeholder, value)| {
					rest.find(placeholder).map(|at| (at, placeholder, value))
				})
				.min_by_key(|(at, _, _)| *at);
			let Some((at, placeholder, value)) = next else {
				out.push_str(rest);

				break;
			};

			out.push_str(&rest[..at]);
			out.push_str(value);

			rest = &rest[at + placeholder.len()..];
		}

		out
	}
}

impl Default for PromptTemplate {
	fn default() -> Self {
		Self::new(DEFAULT_PROMPT_TEMPLATE)
	}
}

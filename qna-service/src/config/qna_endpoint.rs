/// Scheme every QnA Maker runtime host must use.
pub const HTTPS_PREFIX: &str = "https://";

/// Path suffix of the QnA Maker runtime API.
pub const QNAMAKER_SUFFIX: &str = "/qnamaker";

/// Where and how to reach one knowledge base.
///
/// `host` is stored already normalized (see [`normalize_host`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QnaEndpoint {
    /// Runtime base URL, e.g. `https://contoso.azurewebsites.net/qnamaker`.
    pub host: String,
    /// Knowledge base identifier.
    pub knowledge_base_id: String,
    /// Endpoint key sent as `Authorization: EndpointKey {key}`.
    pub endpoint_key: String,
}

impl QnaEndpoint {
    /// Builds an endpoint, normalizing the host.
    pub fn new(
        host: impl AsRef<str>,
        knowledge_base_id: impl Into<String>,
        endpoint_key: impl Into<String>,
    ) -> Self {
        Self {
            host: normalize_host(host.as_ref()),
            knowledge_base_id: knowledge_base_id.into(),
            endpoint_key: endpoint_key.into(),
        }
    }

    /// Full `generateanswer` URL for this knowledge base.
    pub fn generate_answer_url(&self) -> String {
        format!(
            "{}/knowledgebases/{}/generateanswer",
            self.host, self.knowledge_base_id
        )
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("EndpointKey {}", self.endpoint_key)
    }
}

/// Normalizes a configured hostname into a runtime base URL.
///
/// Prepends `https://` and appends `/qnamaker` when missing. Idempotent.
///
/// ```
/// use qna_service::config::qna_endpoint::normalize_host;
///
/// assert_eq!(
///     normalize_host("contoso.cognitiveservices.azure.com"),
///     "https://contoso.cognitiveservices.azure.com/qnamaker"
/// );
/// assert_eq!(normalize_host("https://contoso/qnamaker"), "https://contoso/qnamaker");
/// ```
pub fn normalize_host(raw: &str) -> String {
    let mut host = raw.trim().trim_end_matches('/').to_string();
    if !host.starts_with(HTTPS_PREFIX) {
        host.insert_str(0, HTTPS_PREFIX);
    }
    if !host.ends_with(QNAMAKER_SUFFIX) {
        host.push_str(QNAMAKER_SUFFIX);
    }
    host
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_scheme_and_suffix() {
        assert_eq!(
            normalize_host("contoso.cognitiveservices.azure.com"),
            "https://contoso.cognitiveservices.azure.com/qnamaker"
        );
    }

    #[test]
    fn normalized_host_is_unchanged() {
        let once = normalize_host("https://contoso/qnamaker");
        assert_eq!(once, "https://contoso/qnamaker");
        assert_eq!(normalize_host(&once), once);
    }

    #[test]
    fn partial_forms_are_completed() {
        assert_eq!(normalize_host("https://contoso"), "https://contoso/qnamaker");
        assert_eq!(normalize_host("contoso/qnamaker"), "https://contoso/qnamaker");
        assert_eq!(normalize_host(" contoso/ "), "https://contoso/qnamaker");
    }

    #[test]
    fn url_and_header_are_built_from_parts() {
        let ep = QnaEndpoint::new("contoso", "kb-1", "secret");
        assert_eq!(
            ep.generate_answer_url(),
            "https://contoso/qnamaker/knowledgebases/kb-1/generateanswer"
        );
        assert_eq!(ep.authorization(), "EndpointKey secret");
    }
}

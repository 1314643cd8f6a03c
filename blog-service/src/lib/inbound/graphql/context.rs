/// Per-request data handed to every resolver.
///
/// Built by the HTTP middleware before dispatch and never shared between
/// requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    token: Option<String>,
}

impl RequestContext {
    /// Empty tokens count as absent.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|token| !token.is_empty()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Raw bearer token attached at request entry, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_is_absent() {
        assert_eq!(RequestContext::new(Some(String::new())).token(), None);
        assert_eq!(RequestContext::new(None), RequestContext::anonymous());
        assert_eq!(
            RequestContext::new(Some("abc".to_string())).token(),
            Some("abc")
        );
    }
}

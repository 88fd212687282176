#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_next_link_relative_url() {
        let link = r#"</v2/_catalog?last=repo100&n=100>; rel="next""#;
        assert_eq!(
            next_link(link, "https://registry.example"),
            Some("https://registry.example/v2/_catalog?last=repo100&n=100".to_string())
        );
    }

    #[test]
    fn test_next_link_absolute_url() {
        let link = r#"<https://registry.example/v2/_catalog?last=x>; rel="next""#;
        assert_eq!(
            next_link(link, "https://registry.example"),
            Some("https://registry.example/v2/_catalog?last=x".to_string())
        );
    }

    #[test]
    fn test_next_link_ignores_other_relations() {
        let link = r#"</v2/_catalog?last=x>; rel="prev""#;
        assert_eq!(next_link(link, "https://registry.example"), None);
    }

    #[test]
    fn test_base_url_trailing_slashes_stripped() {
        let client = RegistryClient::new("https://registry.example//", None, false);
        assert_eq!(client.base_url, "https://registry.example");
    }

    #[test]
    fn test_tag_list_null_tags() {
        let list: TagListResponse =
            serde_json::from_str(r#"{"name":"myapp","tags":null}"#).unwrap();
        assert!(list.tags.is_none());
    }

    #[test]
    fn test_catalog_response_parsing() {
        let catalog: CatalogResponse =
            serde_json::from_str(r#"{"repositories":["app/one","app/two"]}"#).unwrap();
        assert_eq!(catalog.repositories, vec!["app/one", "app/two"]);
    }

    #[test]
    fn test_image_config_created_parsing() {
        let config: ImageConfig =
            serde_json::from_str(r#"{"created":"2024-05-12T10:30:00.000000000Z"}"#).unwrap();
        assert_eq!(config.created.to_rfc3339(), "2024-05-12T10:30:00+00:00");
    }
}

use serde::{Deserialize, Serialize};

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_number_of_pages: u32,
    #[serde(default)]
    pub page_size: u32,
    /// Items run from newest to oldest
    #[serde(default)]
    pub last_to_first: bool,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_number_of_pages
    }
}

/// Paging parameters for list requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    pub last_to_first: bool,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: 10,
            last_to_first: false,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            ..Default::default()
        }
    }

    pub fn with_last_to_first(mut self, last_to_first: bool) -> Self {
        self.last_to_first = last_to_first;
        self
    }

    /// The following page
    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            ..self
        }
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("lastToFirst", self.last_to_first.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_uses_node_parameter_names() {
        let query = PageRequest::new(2, 25).with_last_to_first(true).query();
        assert_eq!(
            query,
            vec![
                ("page", "2".to_string()),
                ("pageSize", "25".to_string()),
                ("lastToFirst", "true".to_string()),
            ]
        );
    }

    #[test]
    fn page_defaults_and_next() {
        let page: Page<u32> = serde_json::from_str(
            r#"{"page":0,"totalNumberOfPages":3,"pageSize":2,"items":[1,2]}"#,
        )
        .unwrap();
        assert!(!page.last_to_first);
        assert!(page.has_next());
        assert_eq!(PageRequest::default().next().page, 1);
    }
}

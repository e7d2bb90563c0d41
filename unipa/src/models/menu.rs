//! Smartphone menu models.

use serde::Deserialize;

/// Functions the portal exposes to the smartphone client.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceMenu {
    /// Highest semester number of the deployment (usually 2).
    #[serde(rename = "maxGakkiNo", default)]
    pub max_semester_no: i32,
    /// Function ids enabled for this user (e.g. "Apa006" for the
    /// bulletin board).
    #[serde(rename = "enableFuncIdList", default)]
    pub enabled_func_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_service_menu_deserialization() {
        let body = serde_json::json!({
            "maxGakkiNo": 2,
            "enableFuncIdList": ["Apa003", "Apa006", "Apa010"]
        });
        let menu: ServiceMenu = serde_json::from_value(body).unwrap();
        assert_eq!(menu.max_semester_no, 2);
        assert_eq!(menu.enabled_func_ids.len(), 3);
    }
}

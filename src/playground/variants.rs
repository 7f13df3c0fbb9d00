//! In-memory variant registry behind the playground tabs.
//!
//! Every operation returns a new [`VariantStore`] snapshot; failed
//! validations return an error and leave the current snapshot untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub variant_name: String,
    #[serde(default)]
    pub template_variant_name: Option<String>,
    #[serde(default)]
    pub persistent: bool,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub variant_id: Option<String>,
    #[serde(default)]
    pub base_id: Option<String>,
    /// Root URL of the service that runs this variant.
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariantError {
    #[error("Please enter a name for the new variant.")]
    EmptyName,

    #[error("A variant with this name already exists. Please choose a different name.")]
    DuplicateName(String),

    #[error("Template variant not found. Please choose a valid variant.")]
    TemplateNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariantStore {
    variants: Vec<Variant>,
    active: Option<String>,
}

impl VariantStore {
    /// Store built from backend records; all of them are saved, the first one
    /// is active.
    pub fn from_records(records: Vec<Variant>) -> Self {
        let variants: Vec<Variant> = records
            .into_iter()
            .map(|v| Variant {
                persistent: true,
                ..v
            })
            .collect();
        let active = variants.first().map(|v| v.variant_name.clone());
        Self { variants, active }
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn get(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.variant_name == name)
    }

    /// Name of the active variant, if it is still in the store.
    pub fn active_name(&self) -> Option<&str> {
        self.active_variant().map(|v| v.variant_name.as_str())
    }

    pub fn active_variant(&self) -> Option<&Variant> {
        self.active.as_deref().and_then(|name| self.get(name))
    }

    /// Only unsaved variants can be closed from their tab.
    pub fn is_closable(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.persistent)
    }

    /// Clone `template` as an unsaved variant called `new_name` and select it.
    pub fn add_variant(&self, template: &str, new_name: &str) -> Result<Self, VariantError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(VariantError::EmptyName);
        }
        if self.get(new_name).is_some() {
            return Err(VariantError::DuplicateName(new_name.to_string()));
        }
        let template_variant = self
            .get(template)
            .ok_or_else(|| VariantError::TemplateNotFound(template.to_string()))?;

        let origin = template_variant
            .template_variant_name
            .clone()
            .unwrap_or_else(|| template.to_string());

        let mut next = self.clone();
        next.variants.push(Variant {
            variant_name: new_name.to_string(),
            template_variant_name: Some(origin),
            persistent: false,
            parameters: template_variant.parameters.clone(),
            variant_id: None,
            base_id: template_variant.base_id.clone(),
            uri: template_variant.uri.clone(),
        });
        next.active = Some(new_name.to_string());
        Ok(next)
    }

    /// Drop `name`. When it was active, the last remaining variant becomes
    /// active, or nothing when the list is empty.
    pub fn remove_variant(&self, name: &str) -> Self {
        let variants: Vec<Variant> = self
            .variants
            .iter()
            .filter(|v| v.variant_name != name)
            .cloned()
            .collect();
        let active = if self.active.as_deref() == Some(name) {
            variants.last().map(|v| v.variant_name.clone())
        } else {
            self.active.clone()
        };
        Self { variants, active }
    }

    /// Mark `name` as saved server-side, recording its backend id if one was
    /// assigned by the save.
    pub fn persist_variant(&self, name: &str, variant_id: Option<String>) -> Self {
        self.map_variant(name, |v| Variant {
            persistent: true,
            variant_id: variant_id.clone().or_else(|| v.variant_id.clone()),
            ..v.clone()
        })
    }

    pub fn update_parameters(&self, name: &str, parameters: Map<String, Value>) -> Self {
        self.map_variant(name, |v| Variant {
            parameters: parameters.clone(),
            ..v.clone()
        })
    }

    /// Select `name` if it exists.
    pub fn select(&self, name: &str) -> Self {
        if self.get(name).is_none() {
            return self.clone();
        }
        Self {
            variants: self.variants.clone(),
            active: Some(name.to_string()),
        }
    }

    fn map_variant<F>(&self, name: &str, f: F) -> Self
    where
        F: Fn(&Variant) -> Variant,
    {
        Self {
            variants: self
                .variants
                .iter()
                .map(|v| if v.variant_name == name { f(v) } else { v.clone() })
                .collect(),
            active: self.active.clone(),
        }
    }
}

/// Prefix shown in the New Variant name field: the template name up to its
/// first `.`.
pub fn template_placeholder(template: &str) -> &str {
    template.split('.').next().unwrap_or(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(name: &str) -> Variant {
        let mut parameters = Map::new();
        parameters.insert("temperature".into(), json!(0.5));
        Variant {
            variant_name: name.to_string(),
            template_variant_name: None,
            persistent: false,
            parameters,
            variant_id: Some(format!("id-{}", name)),
            base_id: Some("base-1".into()),
            uri: Some("http://localhost/app".into()),
        }
    }

    fn store() -> VariantStore {
        VariantStore::from_records(vec![record("app.default"), record("app.v2")])
    }

    #[test]
    fn test_from_records_marks_persistent() {
        let store = store();
        assert!(store.variants().iter().all(|v| v.persistent));
        assert_eq!(store.active_name(), Some("app.default"));
        assert!(!store.is_closable("app.default"));
        assert!(VariantStore::from_records(vec![]).active_name().is_none());
    }

    #[test]
    fn test_add_variant_clones_template() {
        let store = store();
        let next = store.add_variant("app.default", "app.experiment").unwrap();

        assert_eq!(next.variants().len(), 3);
        let added = next.variants().last().unwrap();
        assert_eq!(added.variant_name, "app.experiment");
        assert_eq!(added.template_variant_name.as_deref(), Some("app.default"));
        assert!(!added.persistent);
        assert_eq!(added.parameters, store.get("app.default").unwrap().parameters);
        assert_eq!(added.variant_id, None);
        assert_eq!(next.active_name(), Some("app.experiment"));
        assert!(next.is_closable("app.experiment"));

        // the previous snapshot is untouched
        assert_eq!(store.variants().len(), 2);
    }

    #[test]
    fn test_add_variant_inherits_template_origin() {
        let first = store().add_variant("app.default", "app.a").unwrap();
        let second = first.add_variant("app.a", "app.b").unwrap();
        assert_eq!(
            second.get("app.b").unwrap().template_variant_name.as_deref(),
            Some("app.default")
        );
    }

    #[test]
    fn test_add_variant_duplicate_name_rejected() {
        let store = store();
        let err = store.add_variant("app.default", "app.v2").unwrap_err();
        assert_eq!(err, VariantError::DuplicateName("app.v2".into()));
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_add_variant_missing_template_rejected() {
        let err = store().add_variant("app.gone", "app.new").unwrap_err();
        assert_eq!(err, VariantError::TemplateNotFound("app.gone".into()));
    }

    #[test]
    fn test_add_variant_blank_name_rejected() {
        assert_eq!(store().add_variant("app.default", "  ").unwrap_err(), VariantError::EmptyName);
    }

    #[test]
    fn test_remove_active_selects_last_remaining() {
        let store = store()
            .add_variant("app.default", "app.x")
            .unwrap()
            .select("app.default");
        let next = store.remove_variant("app.default");
        assert_eq!(next.active_name(), Some("app.x"));
        assert_eq!(next.variants().len(), 2);
    }

    #[test]
    fn test_remove_inactive_keeps_selection() {
        let next = store().remove_variant("app.v2");
        assert_eq!(next.active_name(), Some("app.default"));
    }

    #[test]
    fn test_remove_last_variant_clears_selection() {
        let next = VariantStore::from_records(vec![record("only")]).remove_variant("only");
        assert!(next.variants().is_empty());
        assert_eq!(next.active_name(), None);
    }

    #[test]
    fn test_persist_variant() {
        let store = store().add_variant("app.default", "app.new").unwrap();
        let saved = store.persist_variant("app.new", Some("id-new".into()));
        let v = saved.get("app.new").unwrap();
        assert!(v.persistent);
        assert_eq!(v.variant_id.as_deref(), Some("id-new"));
        assert!(!saved.is_closable("app.new"));
    }

    #[test]
    fn test_update_parameters() {
        let mut params = Map::new();
        params.insert("temperature".into(), json!(1.1));
        let next = store().update_parameters("app.v2", params);
        assert_eq!(next.get("app.v2").unwrap().parameters["temperature"], json!(1.1));
        assert_eq!(next.get("app.default").unwrap().parameters["temperature"], json!(0.5));
    }

    #[test]
    fn test_select_requested_variant_after_load() {
        let opened = store().select("app.v2");
        assert_eq!(opened.active_variant().map(|v| v.variant_id.as_deref()), Some(Some("id-app.v2")));
        assert_eq!(opened.active_name(), Some("app.v2"));

        // an unknown request leaves the first variant open
        assert_eq!(store().select("app.gone").active_name(), Some("app.default"));
    }

    #[test]
    fn test_select_unknown_is_noop() {
        let store = store();
        assert_eq!(store.select("nope"), store);
    }

    #[test]
    fn test_template_placeholder() {
        assert_eq!(template_placeholder("app.default"), "app");
        assert_eq!(template_placeholder("plain"), "plain");
    }
}

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::imports::errors::ImportError;

/// Behavior of the server-side import job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Source column -> entity field.
    #[serde(rename = "mapeo_campos")]
    pub field_mapping: BTreeMap<String, String>,
    #[serde(rename = "omitir_encabezado", default)]
    pub skip_header: bool,
    #[serde(rename = "actualizar_existentes", default)]
    pub update_existing: bool,
    #[serde(rename = "solo_validar", default)]
    pub validate_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportRequest {
    pub name: String,
    pub entity_type: String,
    pub description: Option<String>,
    pub file: PathBuf,
    pub config: ImportConfig,
}

impl ImportRequest {
    /// Check the request before anything is uploaded.
    pub fn validate(&self) -> Result<(), ImportError> {
        if self.name.trim().is_empty() {
            return Err(ImportError::EmptyName);
        }
        if self.entity_type.trim().is_empty() {
            return Err(ImportError::EmptyEntityType);
        }
        if !self.file.is_file() {
            return Err(ImportError::FileNotFound {
                path: self.file.display().to_string(),
            });
        }
        if self.config.field_mapping.is_empty() {
            return Err(ImportError::EmptyMapping);
        }

        let mut targets = HashSet::new();
        for field in self.config.field_mapping.values() {
            if !targets.insert(field.as_str()) {
                return Err(ImportError::DuplicateTarget {
                    field: field.clone(),
                });
            }
        }
        Ok(())
    }

    /// File name sent with the multipart file part.
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "import".to_string())
    }

    /// Text fields of the multipart form, in send order.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("nombre", self.name.clone()),
            ("tipo_entidad", self.entity_type.clone()),
        ];
        if let Some(description) = &self.description {
            fields.push(("descripcion", description.clone()));
        }
        fields
    }

    /// The configuration blob, serialized as the backend expects it.
    pub fn config_json(&self) -> String {
        serde_json::to_string(&self.config).unwrap_or_else(|_| "{}".to_string())
    }

    /// All non-file form fields as one JSON object (logging and tests).
    pub fn form_fields_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, value) in self.text_fields() {
            map.insert(key.to_string(), serde_json::Value::String(value));
        }
        map.insert(
            "configuracion".to_string(),
            serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null),
        );
        map.insert(
            "archivo".to_string(),
            serde_json::Value::String(self.file_name()),
        );
        serde_json::Value::Object(map)
    }
}

/// Parse `column=field` pairs as given on the command line.
pub fn parse_mapping<S: AsRef<str>>(pairs: &[S]) -> Result<BTreeMap<String, String>, ImportError> {
    let mut mapping = BTreeMap::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (column, field) = pair
            .split_once('=')
            .map(|(c, f)| (c.trim(), f.trim()))
            .filter(|(c, f)| !c.is_empty() && !f.is_empty())
            .ok_or_else(|| ImportError::InvalidMapping {
                value: pair.to_string(),
            })?;
        mapping.insert(column.to_string(), field.to_string());
    }
    Ok(mapping)
}

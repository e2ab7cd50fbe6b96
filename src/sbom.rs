//! Component list ingestion (§6): a flat JSON array, or a CycloneDX/SPDX
//! SBOM auto-detected by shape. Every failure here is an input error — fatal
//! at the entry point, before any file is read (§7).

use serde_json::{Map, Value};

use crate::error::EngineError;
use crate::model::Component;

pub fn parse_components(raw: &str) -> Result<Vec<Component>, EngineError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| EngineError::Input(format!("invalid JSON: {err}")))?;

    if let Some(array) = value.as_array() {
        return parse_flat_array(array);
    }

    if let Some(obj) = value.as_object() {
        if obj.contains_key("spdxVersion") || obj.contains_key("packages") {
            return parse_spdx(obj);
        }
        if obj.contains_key("bomFormat") || obj.contains_key("specVersion") || obj.contains_key("components") {
            return parse_cyclonedx(obj);
        }
    }

    Err(EngineError::Input(
        "component list must be a flat array or a recognized SBOM (CycloneDX or SPDX)".to_string(),
    ))
}

fn parse_flat_array(array: &[Value]) -> Result<Vec<Component>, EngineError> {
    array
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let obj = entry
                .as_object()
                .ok_or_else(|| EngineError::Input(format!("component at index {index} is not an object")))?;
            if !obj.contains_key("name") {
                return Err(EngineError::Input(format!(
                    "component at index {index} is missing required field 'name'"
                )));
            }
            if !obj.contains_key("version") {
                return Err(EngineError::Input(format!(
                    "component at index {index} is missing required field 'version'"
                )));
            }
            let component: Component = serde_json::from_value(entry.clone())
                .map_err(|err| EngineError::Input(format!("component at index {index} is malformed: {err}")))?;
            Ok(component.with_defaults())
        })
        .collect()
}

/// CycloneDX components carry no vulnerability data by themselves (that
/// lives in a separate VEX feed, out of scope here per §1) — only name,
/// version, and a purl-derived ecosystem are recovered.
fn parse_cyclonedx(obj: &Map<String, Value>) -> Result<Vec<Component>, EngineError> {
    let components = obj
        .get("components")
        .and_then(Value::as_array)
        .ok_or_else(|| EngineError::Input("CycloneDX SBOM is missing a 'components' array".to_string()))?;

    components
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| EngineError::Input(format!("CycloneDX component at index {index} is missing 'name'")))?;
            let version = entry.get("version").and_then(Value::as_str).ok_or_else(|| {
                EngineError::Input(format!("CycloneDX component at index {index} is missing 'version'"))
            })?;
            let purl = entry.get("purl").and_then(Value::as_str);
            let ecosystem = purl.and_then(ecosystem_from_purl).unwrap_or_else(|| "npm".to_string());
            Ok(Component {
                name: name.to_string(),
                version: version.to_string(),
                ecosystem,
                purl: purl.map(str::to_string),
                vulnerabilities: Vec::new(),
            }
            .with_defaults())
        })
        .collect()
}

fn parse_spdx(obj: &Map<String, Value>) -> Result<Vec<Component>, EngineError> {
    let packages = obj
        .get("packages")
        .and_then(Value::as_array)
        .ok_or_else(|| EngineError::Input("SPDX SBOM is missing a 'packages' array".to_string()))?;

    packages
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| EngineError::Input(format!("SPDX package at index {index} is missing 'name'")))?;
            let version = entry
                .get("versionInfo")
                .and_then(Value::as_str)
                .ok_or_else(|| EngineError::Input(format!("SPDX package at index {index} is missing 'versionInfo'")))?;
            let purl = spdx_purl(entry);
            let ecosystem = purl.as_deref().and_then(ecosystem_from_purl).unwrap_or_else(|| "npm".to_string());
            Ok(Component {
                name: name.to_string(),
                version: version.to_string(),
                ecosystem,
                purl,
                vulnerabilities: Vec::new(),
            }
            .with_defaults())
        })
        .collect()
}

fn spdx_purl(package: &Value) -> Option<String> {
    package.get("externalRefs")?.as_array()?.iter().find_map(|reference| {
        if reference.get("referenceType")?.as_str()? == "purl" {
            reference.get("referenceLocator")?.as_str().map(str::to_string)
        } else {
            None
        }
    })
}

fn ecosystem_from_purl(purl: &str) -> Option<String> {
    purl.strip_prefix("pkg:")?.split('/').next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_array_parses_with_defaults() {
        let raw = r#"[{"name": "lodash", "version": "4.17.21"}]"#;
        let components = parse_components(raw).unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].ecosystem, "npm");
        assert_eq!(components[0].purl.as_deref(), Some("pkg:npm/lodash@4.17.21"));
    }

    #[test]
    fn non_array_non_sbom_is_input_error() {
        let raw = r#"{"foo": "bar"}"#;
        assert!(parse_components(raw).unwrap_err().is_input());
    }

    #[test]
    fn missing_name_is_fatal_with_index() {
        let raw = r#"[{"version": "1.0.0"}]"#;
        let err = parse_components(raw).unwrap_err();
        assert!(err.is_input());
        assert!(err.to_string().contains("index 0"));
    }

    #[test]
    fn missing_version_is_fatal_with_index() {
        let raw = r#"[{"name": "lodash"}]"#;
        let err = parse_components(raw).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn cyclonedx_is_auto_detected() {
        let raw = r#"{
            "bomFormat": "CycloneDX",
            "specVersion": "1.5",
            "components": [{"type": "library", "name": "lodash", "version": "4.17.21", "purl": "pkg:npm/lodash@4.17.21"}]
        }"#;
        let components = parse_components(raw).unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].ecosystem, "npm");
    }

    #[test]
    fn spdx_is_auto_detected() {
        let raw = r#"{
            "spdxVersion": "SPDX-2.3",
            "packages": [{"name": "lodash", "versionInfo": "4.17.21"}]
        }"#;
        let components = parse_components(raw).unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].name, "lodash");
    }
}

//! Layout component overrides.
//!
//! `made/<site>/src/layouts/index.js` is expected to import each layout
//! component on its own line:
//!
//! ```js
//! import Header from "../components/Header";
//! ```
//!
//! A site can swap components with a `_LAYOUT` mapping:
//!
//! ```yaml
//! _LAYOUT:
//!   Header: CustomHeader.js
//!   Menu: MyMenu.js
//! ```
//!
//! which rewrites exactly those import lines. This is a text substitution on
//! that fixed file shape, not a javascript transform.

use std::fs;
use std::path::{Path, PathBuf};

use regex::{NoExpand, Regex};
use serde_json::Value;

use super::write::write_if_changed;
use crate::site::{Mapping, Result, SiteError};

/// Config key holding component overrides.
pub const LAYOUT_KEY: &str = "_LAYOUT";

/// Layout entry point, relative to the made `src/` directory.
pub fn layout_path(src: &Path) -> PathBuf {
    src.join("layouts").join("index.js")
}

/// Apply `_LAYOUT` overrides to the made layout entry point.
///
/// Returns whether the layout file was rewritten. A config without
/// overrides leaves the tree untouched.
pub fn customize_components(config: &Mapping, src: &Path) -> Result<bool> {
    let overrides = match config.get(LAYOUT_KEY) {
        Some(Value::Object(map)) if !map.is_empty() => map,
        _ => return Ok(false),
    };

    let path = layout_path(src);
    let content = fs::read_to_string(&path).map_err(SiteError::materialize(&path))?;

    let mut rewritten = content;
    for (component, file) in overrides {
        let Value::String(file) = file else {
            return Err(SiteError::InvalidConfig {
                path: path.clone(),
                message: format!("`{LAYOUT_KEY}.{component}` must be a file name"),
            });
        };
        rewritten = rewrite_import(&rewritten, component, file);
    }

    write_if_changed(&path, &rewritten)
}

/// Point `import <component> from "..."` at `../components/<file>`.
pub fn rewrite_import(content: &str, component: &str, file: &str) -> String {
    let pattern = format!(
        r#"(?m)^import {} from ['"][^'"\n]+['"];?"#,
        regex::escape(component)
    );
    // The component name is escaped, so the pattern always compiles.
    let Ok(re) = Regex::new(&pattern) else {
        return content.to_string();
    };
    let replacement = format!(r#"import {component} from "../components/{file}";"#);
    re.replace(content, NoExpand(&replacement)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const LAYOUT: &str = "import React from \"react\";\n\
        import Header from \"../components/Header\";\n\
        import Footer from '../components/Footer'\n\
        import Menu from \"../components/Menu\";\n";

    #[test]
    fn test_rewrite_only_listed_component() {
        let out = rewrite_import(LAYOUT, "Header", "CustomHeader.js");
        assert!(out.contains("import Header from \"../components/CustomHeader.js\";\n"));
        assert!(out.contains("import Menu from \"../components/Menu\";"));
        assert!(out.contains("import Footer from '../components/Footer'"));
    }

    #[test]
    fn test_rewrite_without_semicolon() {
        let out = rewrite_import(LAYOUT, "Footer", "MyFooter.js");
        assert!(out.contains("import Footer from \"../components/MyFooter.js\";\n"));
        assert!(!out.contains(";;"));
    }

    #[test]
    fn test_unknown_component_is_untouched() {
        assert_eq!(rewrite_import(LAYOUT, "Sidebar", "X.js"), LAYOUT);
    }

    #[test]
    fn test_customize_components_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let src = temp.path();
        write_if_changed(&layout_path(src), LAYOUT).unwrap();

        let config = json!({"_LAYOUT": {"Header": "CustomHeader.js", "Menu": "MyMenu.js"}});
        let config = config.as_object().unwrap();

        assert!(customize_components(config, src).unwrap());
        assert!(!customize_components(config, src).unwrap());

        let content = fs::read_to_string(layout_path(src)).unwrap();
        assert!(content.contains("../components/CustomHeader.js"));
        assert!(content.contains("../components/MyMenu.js"));
        assert!(content.contains("'../components/Footer'"));
    }

    #[test]
    fn test_no_directive() {
        let temp = TempDir::new().unwrap();
        let config = json!({"title": "x"});
        assert!(!customize_components(config.as_object().unwrap(), temp.path()).unwrap());
    }

    #[test]
    fn test_missing_layout_file() {
        let temp = TempDir::new().unwrap();
        let config = json!({"_LAYOUT": {"Header": "H.js"}});
        let err = customize_components(config.as_object().unwrap(), temp.path()).unwrap_err();
        assert!(matches!(err, SiteError::Materialize { .. }));
    }

    #[test]
    fn test_non_string_override_is_invalid() {
        let temp = TempDir::new().unwrap();
        write_if_changed(&layout_path(temp.path()), LAYOUT).unwrap();
        let config = json!({"_LAYOUT": {"Header": ["H.js"]}});
        let err = customize_components(config.as_object().unwrap(), temp.path()).unwrap_err();
        assert!(matches!(err, SiteError::InvalidConfig { .. }));
    }
}

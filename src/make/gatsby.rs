//! Generated `gatsby-config.js`.
//!
//! The module is plain data: site metadata plus an ordered plugin list.
//! One value cannot be baked in as a literal: sass include paths must be
//! resolved by node at generator runtime, so a placeholder string is
//! swapped for a javascript expression after serialization.

use std::path::Path;

use serde_json::{Value, json};

use crate::site::{Mapping, Result, SiteError};

/// Placeholder swapped for [`NODE_MODULES_EXPR`] in the generated module.
pub const NODE_MODULES_PLACEHOLDER: &str = "__NODE_MODULES__";

/// Runtime expression resolving the generator's `node_modules`.
pub const NODE_MODULES_EXPR: &str = r#"[require("path").resolve(__dirname, "node_modules")]"#;

/// Config key with extra plugins appended after the built-in ones.
pub const PLUGINS_KEY: &str = "plugins";

/// Build the generator config value from an effective config.
///
/// `origin` names the site config in errors about malformed plugin entries.
pub fn gatsby_config(config: &Mapping, origin: &Path) -> Result<Value> {
    let mut metadata = serde_json::Map::new();
    if let Some(title) = non_blank(config, "title").or_else(|| non_blank(config, "name")) {
        metadata.insert("title".into(), title.clone());
    }
    if let Some(domain) = non_blank(config, "domain") {
        metadata.insert("siteUrl".into(), domain.clone());
    }

    let mut plugins = default_plugins();
    match config.get(PLUGINS_KEY) {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) if s.is_empty() => {}
        Some(Value::Array(extra)) => {
            for (i, plugin) in extra.iter().enumerate() {
                if !is_plugin_entry(plugin) {
                    return Err(SiteError::InvalidConfig {
                        path: origin.to_path_buf(),
                        message: format!(
                            "`{PLUGINS_KEY}[{i}]` must be a plugin name or a mapping with `resolve`"
                        ),
                    });
                }
            }
            plugins.extend(extra.iter().cloned());
        }
        Some(_) => {
            return Err(SiteError::InvalidConfig {
                path: origin.to_path_buf(),
                message: format!("`{PLUGINS_KEY}` must be a list"),
            });
        }
    }

    Ok(json!({
        "siteMetadata": metadata,
        "plugins": plugins,
    }))
}

/// Render `module.exports = ...;` with the placeholder substituted.
pub fn render_gatsby_config(config: &Mapping, origin: &Path) -> Result<String> {
    let value = gatsby_config(config, origin)?;
    // Serializing a `Value` cannot fail.
    let json = serde_json::to_string_pretty(&value).unwrap_or_default();
    let json = json.replace(&format!("\"{NODE_MODULES_PLACEHOLDER}\""), NODE_MODULES_EXPR);
    Ok(format!("module.exports = {json};\n"))
}

/// A value treated as absent (blank strings come from null normalization).
fn non_blank<'a>(config: &'a Mapping, key: &str) -> Option<&'a Value> {
    match config.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(value) => Some(value),
    }
}

/// Bare plugin name, or a mapping naming the plugin under `resolve`.
fn is_plugin_entry(value: &Value) -> bool {
    match value {
        Value::String(name) => !name.is_empty(),
        Value::Object(map) => matches!(map.get("resolve"), Some(Value::String(_))),
        _ => false,
    }
}

fn default_plugins() -> Vec<Value> {
    vec![
        json!("gatsby-plugin-react-helmet"),
        json!("gatsby-plugin-catch-links"),
        json!("gatsby-transformer-json"),
        json!("gatsby-plugin-sharp"),
        json!({
            "resolve": "gatsby-plugin-typography",
            "options": { "pathToConfigModule": "src/utils/typography.js" }
        }),
        json!({
            "resolve": "gatsby-source-filesystem",
            "options": { "path": "./src/data/site.json", "name": "site" }
        }),
        json!({
            "resolve": "gatsby-source-filesystem",
            "options": { "path": "./src/pages", "name": "pages" }
        }),
        json!({
            "resolve": "gatsby-transformer-remark",
            "options": {
                "plugins": [
                    "gatsby-remark-copy-images",
                    "gatsby-remark-autolink-headers",
                    "gatsby-remark-external-links",
                    {
                        "resolve": "gatsby-remark-images",
                        "options": { "maxWidth": 800 }
                    },
                    {
                        "resolve": "gatsby-remark-embed-video",
                        "options": {
                            "width": 800,
                            "ratio": 1.77,
                            "height": 400,
                            "related": false,
                            "noIframeBorder": true
                        }
                    },
                    {
                        "resolve": "gatsby-remark-prismjs",
                        "options": {
                            "classPrefix": "language-",
                            "inlineCodeMarker": null,
                            "aliases": {}
                        }
                    }
                ]
            }
        }),
        json!({
            "resolve": "gatsby-plugin-sass",
            "options": { "includePaths": NODE_MODULES_PLACEHOLDER }
        }),
        json!("gatsby-plugin-antd"),
    ]
}

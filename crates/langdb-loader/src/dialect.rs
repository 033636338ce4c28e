//! Derived dialects: synthetic records built from a host definition.
//!
//! An embedded-language variant (PHP inside HTML, for example) is
//! generated from its host definition rather than written by hand.
//! Generating the resource file itself happens elsewhere; this module
//! only produces the records that feed the aggregator.

use langdb_core::{RecordResult, SourceId, SyntaxRecord};
use serde::{Deserialize, Serialize};

use crate::Diagnostic;

/// Produces synthetic records from the loaded primary records.
pub trait DialectDeriver {
    fn derive(&self, hosts: &[SyntaxRecord], diagnostics: &mut Vec<Diagnostic>) -> Vec<SyntaxRecord>;
}

/// One derivation: `host` -> `source_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectRule {
    /// Source id of the host definition.
    pub host: SourceId,

    /// Source id of the derived definition.
    pub source_id: SourceId,

    /// Embedded dialect label, used for the default name `<host name>/<dialect>`.
    pub dialect: String,

    /// Explicit display name.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub mime_types: Vec<String>,

    #[serde(default)]
    pub first_line_globs: Vec<String>,

    /// Defaults to the host's priority.
    #[serde(default)]
    pub priority: Option<i64>,

    /// Defaults to the host's flag.
    #[serde(default)]
    pub hidden: Option<bool>,
}

impl DialectRule {
    fn embedded(host: &'static str, source_id: &'static str, dialect: &str) -> Self {
        Self {
            host: SourceId::from_static(host),
            source_id: SourceId::from_static(source_id),
            dialect: dialect.to_string(),
            name: None,
            extensions: Vec::new(),
            mime_types: Vec::new(),
            first_line_globs: Vec::new(),
            priority: None,
            hidden: None,
        }
    }

    /// Builds the derived record for `host`. The indenter is inherited.
    pub fn apply(&self, host: &SyntaxRecord) -> RecordResult<SyntaxRecord> {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| format!("{}/{}", host.name(), self.dialect));

        SyntaxRecord::builder(self.source_id.clone(), name)
            .extensions(&self.extensions)
            .mime_types(self.mime_types.iter().cloned())
            .first_line_globs(self.first_line_globs.iter().cloned())
            .priority(self.priority.unwrap_or(host.priority()))
            .hidden(self.hidden.unwrap_or(host.hidden()))
            .indenter(host.indenter().map(str::to_string))
            .build()
    }
}

/// The PHP variants of the JavaScript, CSS and HTML definitions.
pub fn php_rules() -> Vec<DialectRule> {
    let javascript = DialectRule {
        name: Some("JavaScript/PHP".to_string()),
        hidden: Some(true),
        ..DialectRule::embedded("javascript.xml", "javascript-php.xml", "PHP")
    };
    let css = DialectRule {
        name: Some("CSS/PHP".to_string()),
        hidden: Some(true),
        ..DialectRule::embedded("css.xml", "css-php.xml", "PHP")
    };
    let html = DialectRule {
        name: Some("PHP/PHP".to_string()),
        extensions: ["*.php", "*.php3", "*.wml", "*.phtml", "*.phtm", "*.inc", "*.ctp"]
            .map(String::from)
            .to_vec(),
        mime_types: [
            "text/x-php4-src",
            "text/x-php3-src",
            "text/vnd.wap.wmlscript",
            "application/x-php",
        ]
        .map(String::from)
        .to_vec(),
        priority: Some(5),
        hidden: Some(false),
        ..DialectRule::embedded("html.xml", "html-php.xml", "PHP")
    };

    vec![javascript, css, html]
}

impl DialectDeriver for Vec<DialectRule> {
    fn derive(&self, hosts: &[SyntaxRecord], diagnostics: &mut Vec<Diagnostic>) -> Vec<SyntaxRecord> {
        let mut derived = Vec::new();

        for rule in self {
            let Some(host) = hosts.iter().find(|r| r.source_id() == &rule.host) else {
                diagnostics.push(Diagnostic::warning(
                    rule.source_id.as_str(),
                    format!("Host definition {} not found, skipping derived dialect", rule.host),
                ));
                continue;
            };

            match rule.apply(host) {
                Ok(record) => {
                    tracing::debug!("Derived {} from {}", record.source_id(), rule.host);
                    derived.push(record);
                }
                Err(err) => diagnostics.push(Diagnostic::error(rule.source_id.as_str(), err.to_string())),
            }
        }

        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;

    fn host(id: &str, name: &str) -> SyntaxRecord {
        SyntaxRecord::builder(SourceId::new(id).unwrap(), name)
            .extensions(["*.html"])
            .priority(2)
            .indenter(Some("xml".to_string()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_php_rules_derive_from_html() {
        let hosts = vec![host("html.xml", "HTML")];
        let mut diags = Vec::new();
        let derived = php_rules().derive(&hosts, &mut diags);

        assert_eq!(derived.len(), 1);
        let php = &derived[0];
        assert_eq!(php.source_id().as_str(), "html-php.xml");
        assert_eq!(php.name(), "PHP/PHP");
        assert_eq!(php.priority(), 5);
        assert!(php.extensions().contains(&"*.php".to_string()));
        assert_eq!(php.indenter(), Some("xml"));

        // javascript.xml and css.xml are missing
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| d.severity == Severity::Warning));
    }

    #[test]
    fn test_default_name_and_inherited_fields() {
        let rule = DialectRule::embedded("html.xml", "html-tpl.xml", "Template");
        let derived = rule.apply(&host("html.xml", "HTML")).unwrap();
        assert_eq!(derived.name(), "HTML/Template");
        assert_eq!(derived.priority(), 2);
        assert!(!derived.hidden());
        assert!(derived.extensions().is_empty());
    }

    #[test]
    fn test_rule_extensions_are_normalized() {
        let rule = DialectRule {
            extensions: vec![".tpl".to_string()],
            ..DialectRule::embedded("html.xml", "html-tpl.xml", "Template")
        };
        let derived = rule.apply(&host("html.xml", "HTML")).unwrap();
        assert_eq!(derived.extensions(), ["*.tpl"]);
    }

    #[test]
    fn test_rule_from_toml() {
        let rule: DialectRule = toml::from_str(
            r#"
            host = "xml.xml"
            source_id = "xml-php.xml"
            dialect = "PHP"
            hidden = true
            "#,
        )
        .unwrap();
        assert_eq!(rule.host.as_str(), "xml.xml");
        assert_eq!(rule.hidden, Some(true));
        assert!(rule.name.is_none());
    }

    #[test]
    fn test_rule_with_empty_host_fails_to_parse() {
        let parsed = toml::from_str::<DialectRule>(
            r#"
            host = ""
            source_id = "xml-php.xml"
            dialect = "PHP"
            "#,
        );
        assert!(parsed.is_err());
    }
}

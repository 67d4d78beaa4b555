//! POM Plugin Injection
//!
//! Rewrites a Maven `pom.xml` in place so that `project/build/plugins`
//! exists and ends with the android-maven-plugin declaration. The injected
//! descriptor is a fixed value, never derived from the input, and no
//! de-duplication is attempted: running the tool twice appends the plugin
//! twice.

use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::xml::{self, Element, XmlError};

/// Result type for injection operations
pub type InjectResult<T> = Result<T, InjectError>;

#[derive(Debug, Error)]
pub enum InjectError {
    /// The pom file could not be read, parsed or rewritten
    #[error("cannot process '{path}': {source}")]
    Xml { path: PathBuf, source: XmlError },

    /// Defensive assertion: the parsed document carried no root element.
    /// Unreachable for any well-formed pom, which always has one.
    #[error("Root tag 'project' not found!!!")]
    MissingRoot,
}

/// Nested signing configuration of the injected plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignConfig {
    pub debug: bool,
}

/// Coordinates and configuration of a build plugin declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub group_id: &'static str,
    pub artifact_id: &'static str,
    pub version: &'static str,
    pub extensions: bool,
    pub sign: SignConfig,
}

/// The one plugin this tool injects, identical on every invocation
pub const ANDROID_MAVEN_PLUGIN: PluginDescriptor = PluginDescriptor {
    group_id: "com.simpligility.maven.plugins",
    artifact_id: "android-maven-plugin",
    version: "4.6.0",
    extensions: true,
    sign: SignConfig { debug: false },
};

impl PluginDescriptor {
    /// Render the descriptor as a `<plugin>` element tree
    pub fn to_element(&self) -> Element {
        let mut plugin = Element::new("plugin");
        plugin.push_child(Element::with_text("groupId", self.group_id));
        plugin.push_child(Element::with_text("artifactId", self.artifact_id));
        plugin.push_child(Element::with_text("version", self.version));
        plugin.push_child(Element::with_text("extensions", self.extensions.to_string()));

        let mut configuration = Element::new("configuration");
        let mut sign = Element::new("sign");
        sign.push_child(Element::with_text("debug", self.sign.debug.to_string()));
        configuration.push_child(sign);
        plugin.push_child(configuration);
        plugin
    }
}

/// Inject the fixed plugin descriptor into the pom at `path`, overwriting
/// the file in place. The rewrite is destructive and non-transactional.
pub fn inject_plugin(path: &Path) -> InjectResult<()> {
    info!(
        "Injecting {}:{}:{} into {}",
        ANDROID_MAVEN_PLUGIN.group_id,
        ANDROID_MAVEN_PLUGIN.artifact_id,
        ANDROID_MAVEN_PLUGIN.version,
        path.display()
    );

    let mut document = xml::parse_file(path).map_err(|source| InjectError::Xml {
        path: path.to_path_buf(),
        source,
    })?;

    // Strip namespace qualifiers so the plain-name lookups below match
    // documents declaring the Maven POM namespace.
    document.strip_namespaces();

    let root = document.root_mut().ok_or(InjectError::MissingRoot)?;
    let plugins = root
        .get_or_create_child("build")
        .get_or_create_child("plugins");
    plugins.push_child(ANDROID_MAVEN_PLUGIN.to_element());
    debug!(
        "plugins list now holds {} entries",
        plugins.child_elements().count()
    );

    xml::write_file(&document, path).map_err(|source| InjectError::Xml {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const PLAIN_POM: &str = "<project>\n    <groupId>com.example</groupId>\n    <artifactId>demo</artifactId>\n</project>";

    fn write_pom(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("pom.xml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_descriptor_element_shape() {
        let element = ANDROID_MAVEN_PLUGIN.to_element();
        assert_eq!(element.name, "plugin");
        assert_eq!(element.find_child("groupId").unwrap().text(), "com.simpligility.maven.plugins");
        assert_eq!(element.find_child("artifactId").unwrap().text(), "android-maven-plugin");
        assert_eq!(element.find_child("version").unwrap().text(), "4.6.0");
        assert_eq!(element.find_child("extensions").unwrap().text(), "true");
        let debug = element
            .find_child("configuration")
            .and_then(|c| c.find_child("sign"))
            .and_then(|s| s.find_child("debug"))
            .unwrap();
        assert_eq!(debug.text(), "false");
    }

    #[test]
    fn test_inject_creates_build_and_plugins() {
        let dir = tempdir().unwrap();
        let path = write_pom(&dir, PLAIN_POM);

        inject_plugin(&path).unwrap();

        let doc = xml::parse_file(&path).unwrap();
        let root = doc.root().unwrap();
        let plugins = root
            .find_child("build")
            .and_then(|b| b.find_child("plugins"))
            .unwrap();
        assert_eq!(plugins.child_elements().count(), 1);
        let plugin = plugins.find_child("plugin").unwrap();
        assert_eq!(plugin.find_child("version").unwrap().text(), "4.6.0");
        // Pre-existing content survives the rewrite
        assert_eq!(root.find_child("artifactId").unwrap().text(), "demo");
    }

    #[test]
    fn test_inject_appends_after_existing_plugins() {
        let dir = tempdir().unwrap();
        let path = write_pom(
            &dir,
            "<project><build><plugins>\
             <plugin><artifactId>first</artifactId></plugin>\
             <plugin><artifactId>second</artifactId></plugin>\
             </plugins></build></project>",
        );

        inject_plugin(&path).unwrap();

        let doc = xml::parse_file(&path).unwrap();
        let plugins = doc
            .root()
            .unwrap()
            .find_child("build")
            .and_then(|b| b.find_child("plugins"))
            .unwrap();
        let ids: Vec<String> = plugins
            .child_elements()
            .map(|p| p.find_child("artifactId").unwrap().text())
            .collect();
        assert_eq!(ids, vec!["first", "second", "android-maven-plugin"]);
    }

    #[test]
    fn test_inject_twice_accumulates_duplicates() {
        let dir = tempdir().unwrap();
        let path = write_pom(&dir, PLAIN_POM);

        inject_plugin(&path).unwrap();
        inject_plugin(&path).unwrap();

        let doc = xml::parse_file(&path).unwrap();
        let plugins = doc
            .root()
            .unwrap()
            .find_child("build")
            .and_then(|b| b.find_child("plugins"))
            .unwrap();
        assert_eq!(plugins.child_elements().count(), 2);
    }

    #[test]
    fn test_inject_sanitizes_namespaced_pom() {
        let dir = tempdir().unwrap();
        let path = write_pom(
            &dir,
            r#"<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd"><build><plugins/></build></project>"#,
        );

        inject_plugin(&path).unwrap();

        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(!rewritten.contains("xmlns"));
        assert!(!rewritten.contains("xsi:"));
        assert!(rewritten.starts_with("<project>"));
        assert!(rewritten.contains("<artifactId>android-maven-plugin</artifactId>"));
    }

    #[test]
    fn test_inject_fails_on_element_free_document() {
        let dir = tempdir().unwrap();
        let path = write_pom(&dir, "<?xml version=\"1.0\"?>\n");

        let result = inject_plugin(&path);
        assert!(matches!(result, Err(InjectError::MissingRoot)));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Root tag 'project' not found!!!"
        );
    }

    #[test]
    fn test_inject_fails_on_malformed_xml() {
        let dir = tempdir().unwrap();
        let path = write_pom(&dir, "<project><build></project>");

        assert!(matches!(
            inject_plugin(&path),
            Err(InjectError::Xml { .. })
        ));
    }
}

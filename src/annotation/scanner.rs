//! Line scanner pairing test marker annotations with the declarations below them.

use crate::config::MarkerTokens;

/// A marker annotation sealed by the declaration line that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSite {
    /// 1-based line of the marker annotation.
    pub line_number: usize,
    /// Stripped marker annotation text.
    pub marker_text: String,
    /// Stripped declaration line.
    pub declaration: String,
}

impl AnnotationSite {
    /// Name of the annotated function, empty if it cannot be determined.
    pub fn function_name(&self) -> &str {
        extract_function_name(&self.declaration)
    }
}

/// A marker annotation that has not (yet) been followed by a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAnnotation {
    pub line_number: usize,
    pub marker_text: String,
}

impl PendingAnnotation {
    fn seal(self, declaration: &str) -> AnnotationSite {
        AnnotationSite {
            line_number: self.line_number,
            marker_text: self.marker_text,
            declaration: declaration.to_string(),
        }
    }
}

/// Everything the scanner found in one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedFile {
    pub package_name: Option<String>,
    pub annotations: Vec<AnnotationSite>,
    /// Markers with no declaration after them, either because another marker
    /// followed or because the file ended.
    pub unterminated: Vec<PendingAnnotation>,
}

/// Scan the lines of one source file.
///
/// While a marker is pending, blank lines and lines starting with the
/// metadata prefix are skipped; the first other line is its declaration.
pub fn scan<'a, I>(lines: I, markers: &MarkerTokens) -> ScannedFile
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scanned = ScannedFile::default();
    let mut pending: Option<PendingAnnotation> = None;

    for (idx, line) in lines.into_iter().enumerate() {
        let line_number = idx + 1;
        let stripped = line.trim();

        if scanned.package_name.is_none() {
            if let Some(package) = extract_package_name(stripped, &markers.package_prefix) {
                scanned.package_name = Some(package);
                continue;
            }
        }

        if stripped.starts_with(markers.test_marker.as_str()) {
            if let Some(previous) = pending.replace(PendingAnnotation {
                line_number,
                marker_text: stripped.to_string(),
            }) {
                scanned.unterminated.push(previous);
            }
            continue;
        }

        if pending.is_some()
            && !stripped.is_empty()
            && !stripped.starts_with(markers.metadata_prefix.as_str())
        {
            if let Some(open) = pending.take() {
                scanned.annotations.push(open.seal(stripped));
            }
        }
    }

    if let Some(open) = pending {
        scanned.unterminated.push(open);
    }

    scanned
}

/// Package name of a stripped `package a.b.c;` statement.
pub fn extract_package_name(stripped: &str, prefix: &str) -> Option<String> {
    let rest = stripped.strip_prefix(prefix)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let name = rest.split(';').next().unwrap_or(rest).trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Identifier immediately before the first `(` of a declaration line.
///
/// `public void testLogin() {` yields `testLogin`. Returns an empty string
/// when there is no `(` or nothing precedes it.
pub fn extract_function_name(declaration: &str) -> &str {
    let Some(paren) = declaration.find('(') else {
        return "";
    };

    declaration[..paren]
        .trim_end()
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_text(text: &str) -> ScannedFile {
        scan(text.lines(), &MarkerTokens::default())
    }

    #[test]
    fn test_scan_single_annotation() {
        let scanned = scan_text(
            "package com.example.tests;\n\
             @Test(groups = {\"smoke\", \"fast\"})\n\
             public void testLogin() {\n",
        );

        assert_eq!(scanned.package_name.as_deref(), Some("com.example.tests"));
        assert_eq!(scanned.annotations.len(), 1);
        let site = &scanned.annotations[0];
        assert_eq!(site.line_number, 2);
        assert_eq!(site.marker_text, "@Test(groups = {\"smoke\", \"fast\"})");
        assert_eq!(site.declaration, "public void testLogin() {");
        assert_eq!(site.function_name(), "testLogin");
        assert!(scanned.unterminated.is_empty());
    }

    #[test]
    fn test_scan_skips_stacked_metadata() {
        let scanned = scan_text(
            "    @Test(groups = \"slow\")\n\
             \x20   @Parameters({\"user\"})\n\
             \n\
             \x20   @Retry(3)\n\
             \x20   public void testRetries(String user) throws Exception {\n",
        );

        assert_eq!(scanned.annotations.len(), 1);
        assert_eq!(
            scanned.annotations[0].declaration,
            "public void testRetries(String user) throws Exception {"
        );
        assert_eq!(scanned.annotations[0].function_name(), "testRetries");
    }

    #[test]
    fn test_scan_multiple_annotations() {
        let scanned = scan_text(
            "@Test(groups = {\"a\"})\n\
             public void first() {}\n\
             public void helper() {}\n\
             @Test(groups = {\"b\"})\n\
             public void second() {}\n",
        );

        let lines: Vec<usize> = scanned.annotations.iter().map(|a| a.line_number).collect();
        assert_eq!(lines, vec![1, 4]);
        assert_eq!(scanned.annotations[1].function_name(), "second");
    }

    #[test]
    fn test_scan_drops_marker_at_eof() {
        let scanned = scan_text("@Test(groups = {\"a\"})\npublic void ok() {}\n@Test\n@Ignore\n");

        assert_eq!(scanned.annotations.len(), 1);
        assert_eq!(
            scanned.unterminated,
            vec![PendingAnnotation {
                line_number: 3,
                marker_text: "@Test".to_string(),
            }]
        );
    }

    #[test]
    fn test_scan_drops_marker_followed_by_marker() {
        let scanned = scan_text("@Test(groups = \"a\")\n@Test(groups = \"b\")\nvoid run() {}\n");

        assert_eq!(scanned.annotations.len(), 1);
        assert_eq!(scanned.annotations[0].line_number, 2);
        assert_eq!(scanned.unterminated.len(), 1);
        assert_eq!(scanned.unterminated[0].line_number, 1);
    }

    #[test]
    fn test_scan_no_annotations() {
        let scanned = scan_text("package a.b;\n\npublic class Helper {}\n");
        assert!(scanned.annotations.is_empty());
        assert_eq!(scanned.package_name.as_deref(), Some("a.b"));
    }

    #[test]
    fn test_scan_without_package() {
        let scanned = scan_text("@Test\nvoid run() {}\n");
        assert_eq!(scanned.package_name, None);
        assert_eq!(scanned.annotations.len(), 1);
    }

    #[test]
    fn test_scan_custom_markers() {
        let markers = MarkerTokens {
            test_marker: "#[test]".to_string(),
            metadata_prefix: "#[".to_string(),
            package_prefix: "mod".to_string(),
        };
        let text = "mod checks;\n#[test]\n#[ignore]\nfn works() {}\n";
        let scanned = scan(text.lines(), &markers);

        assert_eq!(scanned.package_name.as_deref(), Some("checks"));
        assert_eq!(scanned.annotations[0].function_name(), "works");
    }

    #[test]
    fn test_extract_package_name() {
        assert_eq!(extract_package_name("package com.acme;", "package"), Some("com.acme".to_string()));
        assert_eq!(extract_package_name("package   com.acme ;", "package"), Some("com.acme".to_string()));
        assert_eq!(extract_package_name("packages x;", "package"), None);
        assert_eq!(extract_package_name("import com.acme.*;", "package"), None);
    }

    #[test]
    fn test_extract_function_name() {
        assert_eq!(extract_function_name("public void testLogin() {"), "testLogin");
        assert_eq!(extract_function_name("void spaced (int x)"), "spaced");
        assert_eq!(extract_function_name("testBare()"), "testBare");
        assert_eq!(extract_function_name("public class Foo {"), "");
        assert_eq!(extract_function_name("(int x)"), "");
    }
}

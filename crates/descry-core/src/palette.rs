//! Palettes, tool sections and tools.
//!
//! Every diagram, node and edge description owns exactly one [`Palette`].
//! Tools are plain values: attaching the same tool to several owners clones
//! it, so each owner can be changed without affecting the others.

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::DomainType;

/// What a tool does when invoked in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Creates a semantic element shown through a node description.
    NodeCreation,
    /// Creates a semantic element shown through an edge description.
    EdgeCreation,
    /// Any other operation (delete, rename, drop, ...).
    Generic,
}

/// A palette tool.
///
/// The name may be absent; unnamed tools sort before named ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tool {
    name: Option<String>,
    kind: ToolKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_type: Option<DomainType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
}

impl Tool {
    /// Creates a named tool.
    pub fn new(name: impl Into<String>, kind: ToolKind) -> Self {
        Self {
            name: Some(name.into()),
            kind,
            target_type: None,
            body: None,
        }
    }

    /// Creates a tool without a name.
    pub fn unnamed(kind: ToolKind) -> Self {
        Self {
            name: None,
            kind,
            target_type: None,
            body: None,
        }
    }

    /// Sets the domain type this tool creates (builder style).
    pub fn with_target_type(mut self, target_type: DomainType) -> Self {
        self.target_type = Some(target_type);
        self
    }

    /// Sets the opaque operation body evaluated by the editor (builder style).
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn target_type(&self) -> Option<DomainType> {
        self.target_type
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Total order on tools by name: identical tools are equal, unnamed tools
/// come first, named tools compare lexicographically.
pub fn compare_by_name(a: &Tool, b: &Tool) -> Ordering {
    if std::ptr::eq(a, b) {
        return Ordering::Equal;
    }
    a.name().cmp(&b.name())
}

/// A named group of tools inside a palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSection {
    name: String,
    tools: Vec<Tool>,
}

impl ToolSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tools: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn add_tool(&mut self, tool: Tool) {
        self.tools.push(tool);
    }
}

/// The tools offered by one diagram, node or edge description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sections: Vec<ToolSection>,
    #[serde(skip)]
    supports_sections: bool,
}

impl Palette {
    /// Creates an empty palette that can hold tool sections.
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            sections: Vec::new(),
            supports_sections: true,
        }
    }

    /// Creates an empty palette holding only top-level tools.
    ///
    /// Section placement requests on such a palette fall back to the
    /// top-level tool list.
    pub fn without_sections() -> Self {
        Self {
            supports_sections: false,
            ..Self::new()
        }
    }

    pub fn supports_sections(&self) -> bool {
        self.supports_sections
    }

    /// Direct tools, not grouped in a section.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn sections(&self) -> &[ToolSection] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&ToolSection> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Appends a tool to the top-level tool list.
    pub fn add_tool(&mut self, tool: Tool) {
        self.tools.push(tool);
    }

    /// Appends a tool to the named section, creating the section if needed.
    ///
    /// Palettes without section support receive the tool at the top level.
    pub fn add_tool_in_section(&mut self, section_name: &str, tool: Tool) {
        if !self.supports_sections {
            self.tools.push(tool);
            return;
        }
        match self
            .sections
            .iter_mut()
            .find(|section| section.name == section_name)
        {
            Some(section) => section.add_tool(tool),
            None => {
                let mut section = ToolSection::new(section_name);
                section.add_tool(tool);
                self.sections.push(section);
            }
        }
    }

    /// Total number of tools, including those inside sections.
    pub fn tool_count(&self) -> usize {
        self.tools.len() + self.sections.iter().map(|s| s.tools.len()).sum::<usize>()
    }

    /// Sorts the direct tools and the tools of every section by name.
    ///
    /// The sort is stable and only reorders; section order is kept.
    pub fn sort_tools(&mut self) {
        self.tools.sort_by(compare_by_name);
        for section in &mut self.sections {
            section.tools.sort_by(compare_by_name);
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn names(tools: &[Tool]) -> Vec<Option<&str>> {
        tools.iter().map(Tool::name).collect()
    }

    #[test]
    fn test_sort_puts_unnamed_first() {
        let mut palette = Palette::new();
        palette.add_tool(Tool::new("Zebra", ToolKind::Generic));
        palette.add_tool(Tool::unnamed(ToolKind::Generic));
        palette.add_tool(Tool::new("Apple", ToolKind::Generic));

        palette.sort_tools();

        assert_eq!(names(palette.tools()), [None, Some("Apple"), Some("Zebra")]);
    }

    #[test]
    fn test_section_auto_created_once() {
        let mut palette = Palette::new();
        palette.add_tool_in_section("Nodes", Tool::new("Class", ToolKind::NodeCreation));
        palette.add_tool_in_section("Nodes", Tool::new("Interface", ToolKind::NodeCreation));
        palette.add_tool_in_section("Edges", Tool::new("Usage", ToolKind::EdgeCreation));

        assert_eq!(palette.sections().len(), 2);
        assert_eq!(palette.section("Nodes").map(|s| s.tools().len()), Some(2));
        assert!(palette.tools().is_empty());
        assert_eq!(palette.tool_count(), 3);
    }

    #[test]
    fn test_section_fallback_without_support() {
        let mut palette = Palette::without_sections();
        palette.add_tool_in_section("Nodes", Tool::new("Class", ToolKind::NodeCreation));

        assert!(palette.sections().is_empty());
        assert_eq!(names(palette.tools()), [Some("Class")]);
    }

    #[test]
    fn test_sort_sections_independently() {
        let mut palette = Palette::new();
        palette.add_tool_in_section("B", Tool::new("y", ToolKind::Generic));
        palette.add_tool_in_section("B", Tool::new("x", ToolKind::Generic));
        palette.add_tool_in_section("A", Tool::new("b", ToolKind::Generic));
        palette.add_tool_in_section("A", Tool::new("a", ToolKind::Generic));

        palette.sort_tools();

        let section_names: Vec<&str> = palette.sections().iter().map(ToolSection::name).collect();
        assert_eq!(section_names, ["B", "A"]);
        assert_eq!(names(palette.sections()[0].tools()), [Some("x"), Some("y")]);
        assert_eq!(names(palette.sections()[1].tools()), [Some("a"), Some("b")]);
    }

    #[test]
    fn test_cloned_tool_is_independent() {
        let original = Tool::new("Port", ToolKind::NodeCreation);
        let mut copy = original.clone();
        copy.set_name(Some("Renamed".to_string()));
        assert_eq!(original.name(), Some("Port"));
    }

    fn tool_name_strategy() -> impl Strategy<Value = Option<String>> {
        prop::option::of("[A-Za-z]{0,6}")
    }

    fn check_sort_is_ordered_permutation(names_in: Vec<Option<String>>) -> Result<(), TestCaseError> {
        let mut palette = Palette::new();
        for name in &names_in {
            let mut tool = Tool::unnamed(ToolKind::Generic);
            tool.set_name(name.clone());
            palette.add_tool(tool);
        }

        palette.sort_tools();

        let sorted: Vec<Option<String>> = palette
            .tools()
            .iter()
            .map(|t| t.name().map(str::to_string))
            .collect();
        let mut expected = names_in.clone();
        expected.sort();
        prop_assert_eq!(sorted, expected);
        Ok(())
    }

    proptest! {
        #[test]
        fn sort_yields_ordered_permutation(names_in in prop::collection::vec(tool_name_strategy(), 0..12)) {
            check_sort_is_ordered_permutation(names_in)?;
        }
    }
}

//! HTML rendering helpers for Mermaid diagrams.

/// Detects the diagram type from the first line of instructions.
///
/// ## Examples
///
/// ```rust
/// use lumen_lib::mermaid::detect_diagram_type;
///
/// assert_eq!(detect_diagram_type("flowchart LR"), "Flowchart diagram");
/// assert_eq!(detect_diagram_type("sequenceDiagram"), "Sequence diagram");
/// assert_eq!(detect_diagram_type("unknown"), "Mermaid diagram");
/// ```
pub fn detect_diagram_type(instructions: &str) -> &'static str {
    let first_line = instructions.lines().next().unwrap_or("").trim();

    const KINDS: &[(&str, &str)] = &[
        ("flowchart", "Flowchart diagram"),
        ("graph", "Flowchart diagram"),
        ("sequenceDiagram", "Sequence diagram"),
        ("classDiagram", "Class diagram"),
        ("stateDiagram", "State diagram"),
        ("erDiagram", "Entity relationship diagram"),
        ("pie", "Pie chart"),
        ("gantt", "Gantt chart"),
        ("journey", "User journey diagram"),
        ("gitGraph", "Git graph diagram"),
        ("gitgraph", "Git graph diagram"),
        ("mindmap", "Mind map diagram"),
        ("timeline", "Timeline diagram"),
    ];

    KINDS
        .iter()
        .find(|(prefix, _)| first_line.starts_with(prefix))
        .map(|(_, kind)| *kind)
        .unwrap_or("Mermaid diagram")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_diagram_type_flowchart() {
        assert_eq!(detect_diagram_type("flowchart TD\n    A --> B"), "Flowchart diagram");
        assert_eq!(detect_diagram_type("graph LR"), "Flowchart diagram");
    }

    #[test]
    fn test_detect_diagram_type_variants() {
        assert_eq!(detect_diagram_type("classDiagram"), "Class diagram");
        assert_eq!(detect_diagram_type("stateDiagram-v2"), "State diagram");
        assert_eq!(detect_diagram_type("erDiagram"), "Entity relationship diagram");
        assert_eq!(detect_diagram_type("pie"), "Pie chart");
        assert_eq!(detect_diagram_type("gantt"), "Gantt chart");
        assert_eq!(detect_diagram_type("gitgraph"), "Git graph diagram");
        assert_eq!(detect_diagram_type("mindmap"), "Mind map diagram");
    }

    #[test]
    fn test_detect_diagram_type_unknown() {
        assert_eq!(detect_diagram_type(""), "Mermaid diagram");
        assert_eq!(detect_diagram_type("   \nflowchart"), "Mermaid diagram");
    }
}

use modbuild_domain::ToolOutput;

/// Frame the joined arguments between two rules
pub fn banner(arguments: &[String]) -> ToolOutput {
    if arguments.is_empty() {
        return ToolOutput::failure(1, "Usage: banner TEXT...\n");
    }
    let text = arguments.join(" ");
    let rule = "=".repeat(text.chars().count());
    ToolOutput::success(format!("{rule}\n{text}\n{rule}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_frames_text() {
        let output = banner(&["Build".to_string(), "foo".to_string()]);
        assert_eq!(output.code, 0);
        assert_eq!(output.out, "=========\nBuild foo\n=========\n");
    }

    #[test]
    fn test_banner_requires_text() {
        assert_eq!(banner(&[]).code, 1);
    }
}

//! The `assessgate init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("assessgate.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("assessments")?;
    write_if_missing(Path::new("assessments/example.json"), EXAMPLE_ASSESSMENT)?;
    write_if_missing(
        Path::new("assessments/example-responses.json"),
        EXAMPLE_RESPONSES,
    )?;

    println!("\nNext steps:");
    println!("  1. Run: assessgate validate --assessment assessments/example.json");
    println!(
        "  2. Run: assessgate evaluate --assessment assessments/example.json \
         --responses assessments/example-responses.json"
    );

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# assessgate configuration

# Output format for `evaluate`: text, json, or markdown
default_format = "text"

# Where `evaluate --save` writes JSON reports
output_dir = "./assessgate-results"

# Exit with status 1 when the assessment cannot be submitted
fail_on_errors = false
"#;

const EXAMPLE_ASSESSMENT: &str = r#"{
  "id": "example",
  "title": "Example Screening Assessment",
  "jobId": "example-job",
  "sections": [
    {
      "id": "about-you",
      "title": "About you",
      "questions": [
        {
          "id": "name",
          "title": "Full name",
          "type": "short-text",
          "required": true,
          "validation": { "minLength": 2 }
        },
        {
          "id": "remote",
          "title": "Are you looking for a remote role?",
          "type": "single-choice",
          "required": true,
          "options": ["yes", "no"]
        },
        {
          "id": "timezone",
          "title": "Which timezone do you work in?",
          "type": "short-text",
          "conditionalLogic": {
            "dependsOn": "remote",
            "condition": "equals",
            "value": "yes",
            "action": "require"
          }
        },
        {
          "id": "resume",
          "title": "Resume",
          "type": "file-upload",
          "validation": { "fileTypes": ["pdf", "docx"], "maxFileSize": 5 }
        }
      ]
    }
  ]
}
"#;

const EXAMPLE_RESPONSES: &str = r#"{
  "name": "Grace Hopper",
  "remote": "yes",
  "resume": { "name": "grace.pdf", "size": 180000, "type": "application/pdf" }
}
"#;

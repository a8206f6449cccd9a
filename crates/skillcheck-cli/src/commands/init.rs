//! The `skillcheck init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("skillcheck.toml").exists() {
        println!("skillcheck.toml already exists, skipping.");
    } else {
        std::fs::write("skillcheck.toml", SAMPLE_CONFIG)?;
        println!("Created skillcheck.toml");
    }

    std::fs::create_dir_all("assessments")?;
    let example_path = std::path::Path::new("assessments/example.toml");
    if example_path.exists() {
        println!("assessments/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_ASSESSMENT)?;
        println!("Created assessments/example.toml");
    }

    std::fs::create_dir_all("submissions")?;
    let submission_path = std::path::Path::new("submissions/example.json");
    if !submission_path.exists() {
        std::fs::write(submission_path, EXAMPLE_SUBMISSION)?;
        println!("Created submissions/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Edit skillcheck.toml with your SMS gateway credentials");
    println!("  2. Run: skillcheck validate --assessment assessments/example.toml");
    println!("  3. Run: skillcheck score --assessment assessments/example.toml \\");
    println!("            --submission submissions/example.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# skillcheck configuration

records_dir = "./skillcheck-results"
# recruiter_phone = "+254700000000"

# Named in invitation messages; links point at {app_url}/test/{code}.
company_name = "Skill Check"
app_url = "http://localhost:3000"

# Log notifications instead of sending them.
[notifier]
type = "log"

# Send SMS through Africa's Talking.
# [notifier]
# type = "sms"
# api_key = "${AFRICASTALKING_API_KEY}"
# username = "sandbox"
# sender_id = "SKILLCHECK"
"#;

const EXAMPLE_ASSESSMENT: &str = r#"[assessment]
id = "example"
title = "Workplace Basics"
description = "A short example assessment to get started"
passing_score = 70
duration_minutes = 10

[[questions]]
id = "q1"
question = "Which spreadsheet function adds up a range of cells?"
type = "multiple_choice"
points = 2

[[questions.options]]
id = "q1-a"
text = "SUM"
correct = true

[[questions.options]]
id = "q1-b"
text = "COUNT"

[[questions.options]]
id = "q1-c"
text = "AVERAGE"

[[questions]]
id = "q2"
question = "Replying to every email within five minutes is always required."
type = "true_false"

[[questions.options]]
id = "q2-true"
text = "True"

[[questions.options]]
id = "q2-false"
text = "False"
correct = true

[[questions]]
id = "q3"
question = "What should you do first when a customer reports a problem?"
type = "multiple_choice"

[[questions.options]]
id = "q3-a"
text = "Listen and confirm the details"
correct = true

[[questions.options]]
id = "q3-b"
text = "Escalate immediately"
"#;

const EXAMPLE_SUBMISSION: &str = r#"{
  "answers": {
    "q1": "q1-a",
    "q2": "false",
    "q3": "q3-b"
  },
  "timeSpent": 240
}
"#;

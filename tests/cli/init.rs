use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in [
        "sourceRoot",
        "targetDir",
        "languages",
        "extension",
        "function",
        "template",
        "onMalformed",
    ] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{}' field",
            field
        );
    }

    assert_eq!(parsed["function"], "lang.Translate");
    assert_eq!(parsed["languages"].as_array().map(Vec::len), Some(11));

    assert!(
        content.contains("\n  \""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let result = run(test.command().arg("init"))?;
    assert_eq!(result.code, Some(0));
    assert_eq!(result.stdout, "\u{2713} Created .langdictrc.json\n");

    assert!(test.exists(".langdictrc.json"));
    let content = test.read_file(".langdictrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".langdictrc.json", "{}")?;

    let result = run(test.command().arg("init"))?;
    assert_eq!(result.code, Some(1));
    assert_eq!(result.stderr, "Error: .langdictrc.json already exists\n");
    assert_eq!(test.read_file(".langdictrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_used_by_sync() -> Result<()> {
    let test = CliTest::new()?;
    run(test.command().arg("init"))?;
    test.write_file("main.go", r#"lang.Translate("Hello")"#)?;

    let result = run(&mut test.command())?;
    assert_eq!(result.code, Some(0));
    assert!(test.exists("assets/lang/zh_t.json"));

    Ok(())
}

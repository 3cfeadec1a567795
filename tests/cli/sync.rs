use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

fn setup_config(test: &CliTest) -> Result<()> {
    test.write_file(
        ".langdictrc.json",
        r#"{
            "targetDir": "lang",
            "languages": ["fr", "es"]
        }"#,
    )
}

fn json_keys(content: &str) -> Result<Vec<String>> {
    let parsed: Value = serde_json::from_str(content)?;
    Ok(parsed
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default())
}

#[test]
fn test_sync_bootstraps_missing_files() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file(
        "pages/wallet.go",
        r#"
package pages

func title() string {
	return lang.Translate("Wallet")
}

func send() string {
	return lang.Translate("Send")
}
"#,
    )?;

    let result = run(&mut test.command())?;
    assert_eq!(result.code, Some(0));
    assert_eq!(
        result.stdout,
        "  created lang/gen_template.json\n  \
         created lang/fr.json\n  \
         created lang/es.json\n\
         \u{2713} Synced 2 keys from 1 source file into 2 languages (3 files changed)\n"
    );

    assert_snapshot!(test.read_file("lang/fr.json")?, @r#"
    {
      "Send": "",
      "Wallet": ""
    }
    "#);
    assert_eq!(test.read_file("lang/es.json")?, test.read_file("lang/fr.json")?);
    assert_eq!(
        test.read_file("lang/gen_template.json")?,
        test.read_file("lang/fr.json")?
    );

    Ok(())
}

#[test]
fn test_sync_preserves_translations_and_removes_stale_keys() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file("main.go", r#"lang.Translate("a"); lang.Translate("b")"#)?;
    test.write_file(
        "lang/fr.json",
        r#"{"a": "translated", "b": "old", "c": "stale"}"#,
    )?;

    let result = run(&mut test.command())?;
    assert_eq!(result.code, Some(0));
    assert!(result.stdout.contains("  updated lang/fr.json (+0 -1)\n"));

    assert_snapshot!(test.read_file("lang/fr.json")?, @r#"
    {
      "a": "translated",
      "b": "old"
    }
    "#);

    Ok(())
}

#[test]
fn test_sync_appends_new_keys() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file(
        "main.go",
        r#"lang.Translate("Receive"); lang.Translate("Address"); lang.Translate("Send")"#,
    )?;
    test.write_file(
        "lang/es.json",
        "{\n  \"Send\": \"Enviar\",\n  \"Receive\": \"Recibir\"\n}\n",
    )?;

    run(&mut test.command())?;

    assert_snapshot!(test.read_file("lang/es.json")?, @r#"
    {
      "Send": "Enviar",
      "Receive": "Recibir",
      "Address": ""
    }
    "#);

    Ok(())
}

#[test]
fn test_sync_decodes_escaped_literals() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file(
        "main.go",
        r#"
msg := lang.Translate("hello \"world\"")
same := lang.Translate("hello \x22world\x22")
tab := lang.Translate("a\tb")
"#,
    )?;

    run(&mut test.command())?;

    let content = test.read_file("lang/fr.json")?;
    assert_eq!(json_keys(&content)?, vec!["a\tb", r#"hello "world""#]);
    assert_snapshot!(content, @r#"
    {
      "a\tb": "",
      "hello \"world\"": ""
    }
    "#);

    Ok(())
}

#[test]
fn test_sync_keeps_non_ascii_literal() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file("main.go", r#"lang.Translate("Wallet")"#)?;
    test.write_file("lang/fr.json", r#"{"Wallet": "Portefeuille épargné"}"#)?;

    run(&mut test.command())?;

    assert_snapshot!(test.read_file("lang/fr.json")?, @r#"
    {
      "Wallet": "Portefeuille épargné"
    }
    "#);

    Ok(())
}

#[test]
fn test_sync_is_idempotent() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file("main.go", r#"lang.Translate("One"); lang.Translate("Two")"#)?;
    test.write_file("lang/fr.json", r#"{"One":"Un","Three":"Trois"}"#)?;

    run(&mut test.command())?;
    let fr = test.read_file("lang/fr.json")?;
    let es = test.read_file("lang/es.json")?;
    let template = test.read_file("lang/gen_template.json")?;

    let second = run(&mut test.command())?;
    assert_eq!(second.code, Some(0));
    assert_eq!(
        second.stdout,
        "unchanged lang/gen_template.json\n\
         unchanged lang/fr.json\n\
         unchanged lang/es.json\n\
         \u{2713} Synced 2 keys from 1 source file into 2 languages (0 files changed)\n"
    );

    assert_eq!(test.read_file("lang/fr.json")?, fr);
    assert_eq!(test.read_file("lang/es.json")?, es);
    assert_eq!(test.read_file("lang/gen_template.json")?, template);

    Ok(())
}

#[test]
fn test_check_reports_stale_files_without_writing() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file("main.go", r#"lang.Translate("Hello")"#)?;

    let result = run(test.command().arg("--check"))?;
    assert_eq!(result.code, Some(1));
    assert!(
        result
            .stdout
            .ends_with("\u{2718} 3 files out of date (run without --check to update)\n")
    );
    assert!(!test.exists("lang"));

    run(&mut test.command())?;

    let result = run(test.command().args(["sync", "--check"]))?;
    assert_eq!(result.code, Some(0));
    assert!(
        result
            .stdout
            .ends_with("\u{2713} All files up to date (1 key)\n")
    );

    Ok(())
}

#[test]
fn test_malformed_language_file_is_fatal() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file("main.go", r#"lang.Translate("Hello")"#)?;
    test.write_file("lang/es.json", r#"{"Hello": "Hola",}"#)?;

    let result = run(&mut test.command())?;
    assert_eq!(result.code, Some(2));
    assert!(
        result
            .stderr
            .starts_with("Error: Refusing to overwrite malformed file: lang/es.json")
    );

    assert_eq!(test.read_file("lang/es.json")?, r#"{"Hello": "Hola",}"#);
    assert!(!test.exists("lang/fr.json"));

    Ok(())
}

#[test]
fn test_malformed_language_file_reset_policy() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".langdictrc.json",
        r#"{ "targetDir": "lang", "languages": ["es"], "onMalformed": "reset" }"#,
    )?;
    test.write_file("main.go", r#"lang.Translate("Hello")"#)?;
    test.write_file("lang/es.json", "[]")?;

    let result = run(&mut test.command())?;
    assert_eq!(result.code, Some(0));
    assert!(
        result
            .stderr
            .starts_with("warning: lang/es.json was malformed and has been reset:")
    );

    assert_snapshot!(test.read_file("lang/es.json")?, @r#"
    {
      "Hello": ""
    }
    "#);

    Ok(())
}

#[test]
fn test_non_utf8_source_is_fatal() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_bytes("broken.go", &[0x66, 0x6f, 0xff, 0x6f])?;

    let result = run(&mut test.command())?;
    assert_eq!(result.code, Some(2));
    assert!(result.stderr.contains("Failed to read source file"));
    assert!(!test.exists("lang"));

    Ok(())
}

#[test]
fn test_defaults_without_config() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("ui/button.go", r#"lang.Translate("OK")"#)?;

    let result = run(&mut test.command())?;
    assert_eq!(result.code, Some(0));

    for code in [
        "fr", "es", "it", "jp", "ko", "nl", "pt", "ro", "ru", "zh_s", "zh_t",
    ] {
        let content = test.read_file(&format!("assets/lang/{}.json", code))?;
        assert_eq!(content, "{\n  \"OK\": \"\"\n}\n");
    }
    assert!(test.exists("assets/lang/gen_template.json"));

    Ok(())
}

#[test]
fn test_command_line_overrides() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file("src/app.rs", r#"tr("Quit")"#)?;
    test.write_file("src/ignored.go", r#"lang.Translate("Ignored")"#)?;

    let result = run(test.command().args([
        "--source-root",
        "src",
        "--target-dir",
        "i18n",
        "--languages",
        "de,ja",
        "--extension",
        "rs",
        "--function",
        "tr",
        "--no-template",
    ]))?;
    assert_eq!(result.code, Some(0));

    assert_eq!(test.read_file("i18n/de.json")?, "{\n  \"Quit\": \"\"\n}\n");
    assert!(test.exists("i18n/ja.json"));
    assert!(!test.exists("i18n/gen_template.json"));
    assert!(!test.exists("lang"));

    Ok(())
}

#[test]
fn test_config_in_parent_directory() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file("cmd/main.go", r#"lang.Translate("Root")"#)?;

    let result = run(&mut test.command_in(&test.root().join("cmd")))?;
    assert_eq!(result.code, Some(0));

    assert_eq!(test.read_file("lang/fr.json")?, "{\n  \"Root\": \"\"\n}\n");
    assert!(!test.exists("cmd/lang"));

    Ok(())
}

#[test]
fn test_path_overrides_resolve_against_current_directory() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file("cmd/main.go", r#"lang.Translate("Cmd")"#)?;
    test.write_file("other/x.go", r#"lang.Translate("Other")"#)?;

    let result = run(test
        .command_in(&test.root().join("cmd"))
        .args(["--target-dir", "out", "--source-root", "."]))?;
    assert_eq!(result.code, Some(0));

    assert_eq!(test.read_file("cmd/out/fr.json")?, "{\n  \"Cmd\": \"\"\n}\n");
    assert!(test.exists("cmd/out/gen_template.json"));
    assert!(!test.exists("out"));
    assert!(!test.exists("lang"));

    Ok(())
}

#[test]
fn test_language_sharing_template_file_is_rejected() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".langdictrc.json",
        r#"{ "targetDir": "lang", "languages": ["gen_template"] }"#,
    )?;
    test.write_file("main.go", r#"lang.Translate("Hello")"#)?;
    test.write_file("lang/gen_template.json", r#"{"Hello":"Bonjour"}"#)?;

    let result = run(&mut test.command())?;
    assert_eq!(result.code, Some(2));
    assert!(result.stderr.contains("would share its file with the template"));
    assert_eq!(
        test.read_file("lang/gen_template.json")?,
        r#"{"Hello":"Bonjour"}"#
    );

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_write_failure_is_fatal() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file("main.go", r#"lang.Translate("Hello")"#)?;
    // A dangling link into a missing directory reads as absent but cannot be
    // written through, even with elevated permissions.
    std::fs::create_dir_all(test.root().join("lang"))?;
    std::os::unix::fs::symlink(
        test.root().join("missing/fr.json"),
        test.root().join("lang/fr.json"),
    )?;

    let result = run(&mut test.command())?;
    assert_eq!(result.code, Some(2));
    assert!(
        result
            .stderr
            .starts_with("Error: Failed to write file: lang/fr.json")
    );
    assert!(!test.exists("lang/es.json"));

    Ok(())
}

#[test]
fn test_verbose_lists_source_files() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file("a.go", r#"lang.Translate("x"); lang.Translate("x")"#)?;
    test.write_file("b.go", "package b")?;

    let result = run(test.command().arg("-v"))?;
    assert_eq!(result.code, Some(0));
    assert!(result.stdout.contains("scan ./a.go (2 keys)\n"));
    assert!(result.stdout.contains("scan ./b.go (0 keys)\n"));
    assert!(result.stdout.contains("Scanned 2 source files\n"));

    Ok(())
}

#[test]
fn test_invalid_config_is_fatal() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".langdictrc.json", r#"{ "languages": ["fr", "fr"] }"#)?;

    let result = run(&mut test.command())?;
    assert_eq!(result.code, Some(2));
    assert!(result.stderr.contains("Duplicate language code"));

    Ok(())
}

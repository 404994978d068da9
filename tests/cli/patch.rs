use anyhow::Result;
use indoc::indoc;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, log_filters};

const WORKER: &str = indoc! {r#"
    class Worker:
        def __init__(self):
            self.session_id = "abc123"

        def run(self, task):
            self.logger.info(f"started {task}")
"#};

const WORKER_PATCHED: &str = indoc! {r#"
    class Worker:
        def __init__(self):
            self.session_id = "abc123"

        def run(self, task):
            self.logger.info(f"{self.session_id} | started {task}")
"#};

const HELPER: &str = indoc! {r#"
    class Helper:
        def run(self):
            self.logger.error("failed")
"#};

const BROKEN: &str = "class Broken(:\n    pass\n";

#[test]
fn test_patch_rewrites_eligible_class() -> Result<()> {
    let test = CliTest::with_file("app/worker.py", WORKER)?;
    test.write_file("app/helper.py", HELPER)?;

    insta::with_settings!({filters => log_filters()}, {
        assert_cmd_snapshot!(test.patch_command(), @r"
        success: true
        exit_code: 0
        ----- stdout -----
        Rewrote 1 call(s) in 1 file.

        ----- stderr -----
        INFO patched ./app/worker.py
        ");
    });

    assert_eq!(test.read_file("app/worker.py")?, WORKER_PATCHED);
    assert_eq!(test.read_file("app/helper.py")?, HELPER);
    Ok(())
}

#[test]
fn test_patch_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::with_file("worker.py", WORKER)?;

    let mut cmd = test.patch_command();
    cmd.arg("--dry-run");
    insta::with_settings!({filters => log_filters()}, {
        assert_cmd_snapshot!(cmd, @r#"
        success: false
        exit_code: 1
        ----- stdout -----
          --> ./worker.py:6:9  [info]
             |
             - f"started {task}"
             + f"{self.session_id} | started {task}"

        Would rewrite 1 call(s) in 1 file.
        Run without --dry-run to apply these changes.

        ----- stderr -----
        "#);
    });

    assert_eq!(test.read_file("worker.py")?, WORKER);
    Ok(())
}

#[test]
fn test_patch_verbose_shows_rewritten_calls() -> Result<()> {
    let test = CliTest::with_file("worker.py", WORKER)?;

    let mut cmd = test.patch_command();
    cmd.arg("-v");
    // Keep debug events out of the snapshot.
    cmd.env("SIDTAG_LOG", "info");
    insta::with_settings!({filters => log_filters()}, {
        assert_cmd_snapshot!(cmd, @r#"
        success: true
        exit_code: 0
        ----- stdout -----
          --> ./worker.py:6:9  [info]
             |
             - f"started {task}"
             + f"{self.session_id} | started {task}"

        Rewrote 1 call(s) in 1 file.

        ----- stderr -----
        INFO patched ./worker.py
        "#);
    });

    assert_eq!(test.read_file("worker.py")?, WORKER_PATCHED);
    Ok(())
}

#[test]
fn test_patch_is_idempotent() -> Result<()> {
    let test = CliTest::with_file("worker.py", WORKER)?;

    let first = test.patch_command().output()?;
    assert_eq!(first.status.code(), Some(0));
    assert_eq!(test.read_file("worker.py")?, WORKER_PATCHED);

    insta::with_settings!({filters => log_filters()}, {
        assert_cmd_snapshot!(test.patch_command(), @r"
        success: true
        exit_code: 0
        ----- stdout -----
        ✓ Checked 1 python file - nothing to rewrite

        ----- stderr -----
        ");
    });
    assert_eq!(test.read_file("worker.py")?, WORKER_PATCHED);

    let dry_run = test.patch_command().arg("--dry-run").output()?;
    assert_eq!(dry_run.status.code(), Some(0));
    Ok(())
}

#[test]
fn test_patch_rewrites_every_message_shape() -> Result<()> {
    let test = CliTest::with_file(
        "service.py",
        indoc! {r#"
            class Service:
                def start(self, sid, err):
                    self.session_id = sid
                    self.logger.info("plain {braces}")
                    self.logger.debug(f"value={err!r}")
                    self.logger.warning(err)
                    self.logger.error(str(err), exc_info=True)
                    self.logger.success(r'raw\d')
                    self.logger.info(f"{self.session_id} | done")
        "#},
    )?;

    insta::with_settings!({filters => log_filters()}, {
        assert_cmd_snapshot!(test.patch_command(), @r"
        success: true
        exit_code: 0
        ----- stdout -----
        Rewrote 5 call(s) in 1 file.

        ----- stderr -----
        INFO patched ./service.py
        ");
    });

    assert_eq!(
        test.read_file("service.py")?,
        indoc! {r#"
            class Service:
                def start(self, sid, err):
                    self.session_id = sid
                    self.logger.info(f"{self.session_id} | plain {{braces}}")
                    self.logger.debug(f"{self.session_id} | value={err!r}")
                    self.logger.warning(f"{self.session_id} | {err}")
                    self.logger.error(f"{self.session_id} | {str(err)}", exc_info=True)
                    self.logger.success(rf'{self.session_id} | raw\d')
                    self.logger.info(f"{self.session_id} | done")
        "#}
    );
    Ok(())
}

#[test]
fn test_patch_skips_unparsable_file() -> Result<()> {
    let test = CliTest::with_file("worker.py", WORKER)?;
    test.write_file("broken.py", BROKEN)?;

    insta::with_settings!({filters => log_filters()}, {
        assert_cmd_snapshot!(test.patch_command(), @r"
        success: true
        exit_code: 0
        ----- stdout -----
        Rewrote 1 call(s) in 1 file.

        ----- stderr -----
        INFO patched ./worker.py
        warning: 1 file(s) could not be parsed and were left unchanged (use -v for details)
        ");
    });

    assert_eq!(test.read_file("broken.py")?, BROKEN);
    assert_eq!(test.read_file("worker.py")?, WORKER_PATCHED);
    Ok(())
}

#[test]
fn test_patch_verbose_names_unparsable_file() -> Result<()> {
    let test = CliTest::with_file("broken.py", BROKEN)?;

    let mut cmd = test.patch_command();
    cmd.arg("-v");
    cmd.env("SIDTAG_LOG", "info");
    let mut filters = log_filters();
    filters.push((
        r"broken\.py:\d+:\d+: invalid syntax at \d+:\d+",
        "broken.py:[POS]: invalid syntax at [POS]",
    ));
    insta::with_settings!({filters => filters}, {
        assert_cmd_snapshot!(cmd, @r"
        success: true
        exit_code: 0
        ----- stdout -----
        ✓ Checked 1 python file - nothing to rewrite

        ----- stderr -----
        warning: skipped ./broken.py:[POS]: invalid syntax at [POS]
        ");
    });

    assert_eq!(test.read_file("broken.py")?, BROKEN);
    Ok(())
}

#[test]
fn test_patch_single_file_argument() -> Result<()> {
    let test = CliTest::with_file("a/worker.py", WORKER)?;
    test.write_file("b/worker.py", WORKER)?;

    let mut cmd = test.patch_command();
    cmd.arg("a/worker.py");
    insta::with_settings!({filters => log_filters()}, {
        assert_cmd_snapshot!(cmd, @r"
        success: true
        exit_code: 0
        ----- stdout -----
        Rewrote 1 call(s) in 1 file.

        ----- stderr -----
        INFO patched a/worker.py
        ");
    });

    assert_eq!(test.read_file("a/worker.py")?, WORKER_PATCHED);
    assert_eq!(test.read_file("b/worker.py")?, WORKER);
    Ok(())
}

#[test]
fn test_patch_directory_argument() -> Result<()> {
    let test = CliTest::with_file("pkg/worker.py", WORKER)?;
    test.write_file("other/worker.py", WORKER)?;

    let mut cmd = test.patch_command();
    cmd.arg("pkg");
    insta::with_settings!({filters => log_filters()}, {
        assert_cmd_snapshot!(cmd, @r"
        success: true
        exit_code: 0
        ----- stdout -----
        Rewrote 1 call(s) in 1 file.

        ----- stderr -----
        INFO patched pkg/worker.py
        ");
    });

    assert_eq!(test.read_file("pkg/worker.py")?, WORKER_PATCHED);
    assert_eq!(test.read_file("other/worker.py")?, WORKER);
    Ok(())
}

#[test]
fn test_patch_missing_path_is_error() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.patch_command();
    cmd.arg("nope");
    assert_cmd_snapshot!(cmd, @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: Path does not exist: nope
    ");
    Ok(())
}

#[test]
fn test_patch_respects_ignores() -> Result<()> {
    let test = CliTest::with_file("worker.py", WORKER)?;
    test.write_file(".venv/lib/worker.py", WORKER)?;
    test.write_file("generated/worker.py", WORKER)?;
    test.write_file(".sidtagrc.json", r#"{ "ignores": ["**/.venv/**", "generated"] }"#)?;

    insta::with_settings!({filters => log_filters()}, {
        assert_cmd_snapshot!(test.patch_command(), @r"
        success: true
        exit_code: 0
        ----- stdout -----
        Rewrote 1 call(s) in 1 file.

        ----- stderr -----
        INFO patched ./worker.py
        ");
    });

    assert_eq!(test.read_file("worker.py")?, WORKER_PATCHED);
    assert_eq!(test.read_file(".venv/lib/worker.py")?, WORKER);
    assert_eq!(test.read_file("generated/worker.py")?, WORKER);
    Ok(())
}

#[test]
fn test_patch_with_custom_names() -> Result<()> {
    let test = CliTest::with_file(
        ".sidtagrc.json",
        r#"{
            "loggerAttribute": "log",
            "sessionAttribute": "sid",
            "levels": ["info", "critical"]
        }"#,
    )?;
    test.write_file(
        "job.py",
        indoc! {r#"
            class Job:
                def __init__(self, sid):
                    self.sid = sid

                def run(self):
                    self.log.info("run")
                    self.log.critical("boom")
                    self.log.debug("not configured")
                    self.logger.info("other attribute")
        "#},
    )?;

    insta::with_settings!({filters => log_filters()}, {
        assert_cmd_snapshot!(test.patch_command(), @r"
        success: true
        exit_code: 0
        ----- stdout -----
        Rewrote 2 call(s) in 1 file.

        ----- stderr -----
        INFO patched ./job.py
        ");
    });

    assert_eq!(
        test.read_file("job.py")?,
        indoc! {r#"
            class Job:
                def __init__(self, sid):
                    self.sid = sid

                def run(self):
                    self.log.info(f"{self.sid} | run")
                    self.log.critical(f"{self.sid} | boom")
                    self.log.debug("not configured")
                    self.logger.info("other attribute")
        "#}
    );
    Ok(())
}

#[test]
fn test_patch_class_body_eligibility() -> Result<()> {
    let source = indoc! {r#"
        class Outer:
            class Settings:
                def setup(self):
                    self.session_id = "x"

            def run(self):
                self.logger.info("outer")
    "#};

    let methods = CliTest::with_file("outer.py", source)?;
    insta::with_settings!({filters => log_filters()}, {
        assert_cmd_snapshot!(methods.patch_command(), @r"
        success: true
        exit_code: 0
        ----- stdout -----
        ✓ Checked 1 python file - nothing to rewrite

        ----- stderr -----
        ");
    });
    assert_eq!(methods.read_file("outer.py")?, source);

    let class_body = CliTest::with_file("outer.py", source)?;
    class_body.write_file(".sidtagrc.json", r#"{ "eligibility": "classBody" }"#)?;
    insta::with_settings!({filters => log_filters()}, {
        assert_cmd_snapshot!(class_body.patch_command(), @r"
        success: true
        exit_code: 0
        ----- stdout -----
        Rewrote 1 call(s) in 1 file.

        ----- stderr -----
        INFO patched ./outer.py
        ");
    });
    assert!(
        class_body
            .read_file("outer.py")?
            .contains(r#"self.logger.info(f"{self.session_id} | outer")"#)
    );
    Ok(())
}

#[test]
fn test_patch_invalid_config_is_error() -> Result<()> {
    let test = CliTest::with_file("worker.py", WORKER)?;
    test.write_file(".sidtagrc.json", r#"{ "levels": [] }"#)?;

    assert_cmd_snapshot!(test.patch_command(), @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: 'levels' must name at least one logger method
    ");

    assert_eq!(test.read_file("worker.py")?, WORKER);
    Ok(())
}

#[test]
fn test_patch_log_filter_from_env() -> Result<()> {
    let test = CliTest::with_file("worker.py", WORKER)?;

    let mut cmd = test.patch_command();
    cmd.env("SIDTAG_LOG", "warn");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Rewrote 1 call(s) in 1 file.

    ----- stderr -----
    ");

    assert_eq!(test.read_file("worker.py")?, WORKER_PATCHED);
    Ok(())
}

//! End-to-end pipeline tests: validation, secret materialization,
//! fragment generation, credential embedding, template rendering,
//! backups, and exit codes.

mod support;
use support::*;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

const GCS_DOC: &str = "{\n  \"type\": \"service_account\",\n  \"project_id\": \"obs-prod\"\n}";

const MANIFEST: &str = r#"
required = ["LOKI_HOST", "DB_PASSWORD"]

[fragments]
list_setting = "LOG_PATH_LIST"
default_pattern = "/var/log/*.log"

[credentials]
setting = "GCS_SERVICE_ACCOUNT_B64"
bind_as = "GCS_CREDENTIALS_BLOCK"
middle_indent = 8
last_indent = 6

[[secrets]]
setting = "GCS_SERVICE_ACCOUNT_B64"
target = "secrets/gcs.json"
mode = "base64"

[[secrets]]
setting = "DB_PASSWORD"
target = "secrets/db_password"
mode = "raw"

[[templates]]
source = "templates/agent.yml.tmpl"
target = "rendered/agent.yml"

[[templates]]
source = "templates/loki.yml.tmpl"
target = "rendered/loki.yml"
"#;

const AGENT_TEMPLATE: &str = "server:\n  host: ${LOKI_HOST}\nscrape_configs:\n${SCRAPE_JOBS}";

const LOKI_TEMPLATE: &str = "\
storage:\n  gcs:\n    credentials: |\n      ${GCS_CREDENTIALS_BLOCK}\n  password: ${DB_PASSWORD}\n";

fn full_env() -> String {
    format!(
        "LOKI_HOST=loki.internal\n\
         DB_PASSWORD=s3cret-pw\n\
         LOG_PATH_LIST=/var/log/app.log, /var/log/ access.log\n\
         GCS_SERVICE_ACCOUNT_B64={}\n",
        BASE64.encode(GCS_DOC)
    )
}

fn full_deployment() -> Test {
    let t = Test::with_files(MANIFEST, &full_env());
    t.write("templates/agent.yml.tmpl", AGENT_TEMPLATE);
    t.write("templates/loki.yml.tmpl", LOKI_TEMPLATE);
    t
}

#[test]
fn end_to_end_materializes_everything() {
    let t = full_deployment();

    let output = t.run();
    assert_success(&output);

    // Secret files
    assert_eq!(t.read("secrets/gcs.json"), GCS_DOC);
    assert_eq!(t.read("secrets/db_password"), "s3cret-pw\n");

    // Agent config carries one scrape job per list entry, in order,
    // disambiguated by ordinal index.
    let agent = t.read("rendered/agent.yml");
    assert!(agent.contains("host: loki.internal"));
    assert!(agent.contains("job_name: var_log_app_log_0"));
    assert!(agent.contains("job_name: var_log_access_log_1"));
    assert!(agent.contains("__path__: /var/log/app.log"));
    assert!(agent.contains("__path__: /var/log/ access.log"));

    // Loki config embeds the reindented credential document.
    let loki = t.read("rendered/loki.yml");
    assert!(loki.contains("credentials: |\n      {"));
    assert!(loki.contains("        \"type\": \"service_account\""));
    assert!(loki.contains("      }"));
    assert!(loki.contains("password: s3cret-pw"));
}

#[cfg(unix)]
#[test]
fn secret_files_are_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let t = full_deployment();
    assert_success(&t.run());

    for rel in ["secrets/gcs.json", "secrets/db_password"] {
        let mode = std::fs::metadata(t.path(rel))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600, "unexpected mode on {rel}");
    }
}

#[test]
fn rerun_is_idempotent_except_for_backups() {
    let t = full_deployment();

    assert_success(&t.run());
    let agent_first = t.read("rendered/agent.yml");
    let loki_first = t.read("rendered/loki.yml");
    assert!(t.backups_of("rendered/agent.yml").is_empty());

    assert_success(&t.run());
    assert_eq!(t.read("rendered/agent.yml"), agent_first);
    assert_eq!(t.read("rendered/loki.yml"), loki_first);
    assert_eq!(t.backups_of("rendered/agent.yml").len(), 1);
    assert_eq!(t.backups_of("rendered/loki.yml").len(), 1);
    assert_eq!(t.backups_of("secrets/gcs.json").len(), 1);
}

#[test]
fn pre_existing_target_is_backed_up_with_its_old_content() {
    let t = full_deployment();
    t.write("rendered/loki.yml", "hand-edited previous version\n");

    assert_success(&t.run());

    let backups = t.backups_of("rendered/loki.yml");
    assert_eq!(backups.len(), 1);
    assert_eq!(
        std::fs::read_to_string(&backups[0]).unwrap(),
        "hand-edited previous version\n"
    );
    assert!(t.read("rendered/loki.yml").contains("password: s3cret-pw"));
}

#[test]
fn placeholder_setting_fails_the_run_but_rendering_continues() {
    let t = full_deployment();
    t.write(
        "stack.env",
        &full_env().replace("DB_PASSWORD=s3cret-pw", "DB_PASSWORD=REPLACE_ME"),
    );

    let output = t.run();
    assert_failure(&output);
    assert_stdout_contains(&output, "placeholder");
    assert_stdout_contains(&output, "DB_PASSWORD");

    // Rendering is not blocked by a validation failure.
    assert!(t.exists("rendered/agent.yml"));
}

#[test]
fn unknown_placeholders_are_left_literal() {
    let t = Test::with_files(
        "[[templates]]\nsource = \"t.tmpl\"\ntarget = \"out.yml\"\n",
        "HOST=loki\n",
    );
    t.write("t.tmpl", "host: ${HOST}\nkeep: ${NOT_A_SETTING}\n");

    assert_success(&t.run());
    assert_eq!(
        t.read("out.yml"),
        "host: loki\nkeep: ${NOT_A_SETTING}\n"
    );
}

#[test]
fn absent_path_list_falls_back_to_default_fragment() {
    let t = full_deployment();
    t.write(
        "stack.env",
        &full_env().replace(
            "LOG_PATH_LIST=/var/log/app.log, /var/log/ access.log\n",
            "",
        ),
    );

    assert_success(&t.run());

    let agent = t.read("rendered/agent.yml");
    assert!(agent.contains("job_name: var_log_log_0"));
    assert!(agent.contains("__path__: /var/log/*.log"));
}

#[test]
fn absent_credential_binds_empty_but_dependent_secret_fails() {
    let t = full_deployment();
    let env = full_env()
        .lines()
        .filter(|l| !l.starts_with("GCS_SERVICE_ACCOUNT_B64="))
        .collect::<Vec<_>>()
        .join("\n");
    t.write("stack.env", &env);

    let output = t.run();
    // The credential binding is optional; only the secret step that
    // consumes the same setting fails.
    assert_failure(&output);
    assert_stdout_contains(&output, "GCS_SERVICE_ACCOUNT_B64");
    assert!(t.exists("rendered/loki.yml"));
    assert!(!t.read("rendered/loki.yml").contains("${GCS_CREDENTIALS_BLOCK}"));
}

#[test]
fn missing_template_is_reported_and_other_renders_proceed() {
    let t = full_deployment();
    std::fs::remove_file(t.path("templates/agent.yml.tmpl")).unwrap();

    let output = t.run();
    assert_failure(&output);
    assert_stderr_contains(&output, "template not found");
    assert!(t.exists("rendered/loki.yml"));
    assert!(!t.exists("rendered/agent.yml"));
}

#[test]
fn missing_manifest_aborts_immediately() {
    let t = Test::new();

    let output = t.run();
    assert_failure(&output);
    assert_stderr_contains(&output, "manifest not found");
}

#[test]
fn missing_env_file_aborts_immediately() {
    let t = Test::new();
    t.write("stackform.toml", "required = [\"A\"]\n");

    let output = t.run();
    assert_failure(&output);
    assert_stderr_contains(&output, "environment file not found");
}

#[test]
fn wrong_user_aborts_before_writing_anything() {
    let t = full_deployment();
    t.write(
        "stackform.toml",
        &format!("expect_user = \"stackform-nobody\"\n{}", MANIFEST),
    );

    let output = t.run();
    assert_failure(&output);
    assert_stderr_contains(&output, "stackform-nobody");
    assert!(!t.exists("rendered/agent.yml"));
    assert!(!t.exists("secrets/db_password"));
}

#[test]
fn env_file_flag_overrides_manifest() {
    let t = Test::with_files(
        "env_file = \"missing.env\"\n[[templates]]\nsource = \"t.tmpl\"\ntarget = \"out.yml\"\n",
        "",
    );
    t.write("t.tmpl", "host: ${HOST}\n");
    t.write("other.env", "HOST=elsewhere\n");

    let output = t
        .cmd()
        .args(["run", "--env-file", "other.env"])
        .output()
        .expect("failed to run stackform");
    assert_success(&output);
    assert_eq!(t.read("out.yml"), "host: elsewhere\n");
}

#[test]
fn malformed_base64_secret_fails_that_step_only() {
    let t = full_deployment();
    t.write(
        "stack.env",
        &full_env()
            .lines()
            .map(|l| {
                if l.starts_with("GCS_SERVICE_ACCOUNT_B64=") {
                    "GCS_SERVICE_ACCOUNT_B64=!!!not-base64!!!".to_string()
                } else {
                    l.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
    );

    let output = t.run();
    assert_failure(&output);
    assert_stderr_contains(&output, "not valid base64");

    // The other secret and both templates still materialize.
    assert!(t.exists("secrets/db_password"));
    assert!(t.exists("rendered/agent.yml"));
    assert!(t.exists("rendered/loki.yml"));
    assert!(!t.exists("secrets/gcs.json"));
}

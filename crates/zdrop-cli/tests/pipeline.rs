//! Full claim pipeline through the CLI: params, identities, commitment, proof, state.

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;

fn zdrop() -> assert_cmd::Command {
    cargo_bin_cmd!("zdrop")
}

fn s(path: &Path) -> &str {
    path.to_str().expect("path is valid UTF-8")
}

fn stdout(cmd: &mut assert_cmd::Command) -> String {
    let output = cmd.output().expect("run");
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout)
        .expect("utf-8")
        .trim()
        .to_owned()
}

#[test]
#[ignore = "Full pipeline: generates params and Halo2 proofs"]
fn pipeline_claims_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let params = dir.path().join("params.bin");
    let key = dir.path().join("identity.json");
    let other = dir.path().join("other.json");
    let members = dir.path().join("members.json");
    let config = dir.path().join("config.json");
    let proof = dir.path().join("proof.json");
    let db = dir.path().join("state");
    let authority = "aa".repeat(32);
    let sender = "01".repeat(32);

    zdrop()
        .args(["setup", "params", "--out", s(&params)])
        .assert()
        .success();
    for path in [&key, &other] {
        zdrop()
            .args(["key", "generate", "--out", s(path)])
            .assert()
            .success();
    }

    let public_key = |path: &Path| -> serde_json::Value {
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).expect("read")).expect("parse");
        json["public_key"].clone()
    };
    let list = serde_json::json!({ "members": [public_key(&other), public_key(&key)] });
    std::fs::write(&members, list.to_string()).expect("write members");

    zdrop()
        .args([
            "commitment",
            "build",
            "--members",
            s(&members),
            "--message",
            "pipeline",
            "--authority",
            &authority,
            "--config-out",
            s(&config),
        ])
        .assert()
        .success();

    zdrop()
        .args([
            "claim",
            "prove",
            "--config",
            s(&config),
            "--members",
            s(&members),
            "--key",
            s(&key),
            "--params",
            s(&params),
            "--params-mode",
            "require",
            "--proof-out",
            s(&proof),
        ])
        .assert()
        .success();

    zdrop()
        .args([
            "verify",
            "proof",
            "--config",
            s(&config),
            "--proof",
            s(&proof),
            "--params",
            s(&params),
        ])
        .assert()
        .success();

    let submit = |cmd: &mut assert_cmd::Command| {
        cmd.args([
            "state",
            "submit",
            "--db",
            s(&db),
            "--config",
            s(&config),
            "--proof",
            s(&proof),
            "--params",
            s(&params),
            "--sender",
            &sender,
        ]);
    };

    // No commitment yet.
    let mut cmd = zdrop();
    submit(&mut cmd);
    cmd.assert().failure();

    // Only the authority may publish.
    zdrop()
        .args([
            "state", "publish", "--db", s(&db), "--config", s(&config), "--sender", &sender,
        ])
        .assert()
        .failure();
    zdrop()
        .args([
            "state",
            "publish",
            "--db",
            s(&db),
            "--config",
            s(&config),
            "--sender",
            &authority,
        ])
        .assert()
        .success();

    let mut cmd = zdrop();
    submit(&mut cmd);
    assert_eq!(stdout(&mut cmd), "1000");

    let mut cmd = zdrop();
    submit(&mut cmd);
    cmd.assert().failure();

    let balance = stdout(zdrop().args(["state", "balance", "--db", s(&db), &sender]));
    assert_eq!(balance, "1000");

    let proof_json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&proof).expect("read")).expect("parse");
    let nullifier = proof_json["nullifier"].as_str().expect("nullifier");
    let used = stdout(zdrop().args(["state", "nullifier", "--db", s(&db), nullifier]));
    assert_eq!(used, "true");

    // A second round over the same members has the same root but a fresh nullifier.
    let other_config = dir.path().join("other-config.json");
    let other_proof = dir.path().join("other-proof.json");
    zdrop()
        .args([
            "commitment",
            "build",
            "--members",
            s(&members),
            "--message",
            "pipeline-again",
            "--grant-amount",
            "1000000",
            "--authority",
            &authority,
            "--config-out",
            s(&other_config),
        ])
        .assert()
        .success();
    zdrop()
        .args([
            "claim",
            "prove",
            "--config",
            s(&other_config),
            "--members",
            s(&members),
            "--key",
            s(&key),
            "--params",
            s(&params),
            "--params-mode",
            "require",
            "--proof-out",
            s(&other_proof),
        ])
        .assert()
        .success();

    for config in [&other_config, &config] {
        zdrop()
            .args([
                "state",
                "submit",
                "--db",
                s(&db),
                "--config",
                s(config),
                "--proof",
                s(&other_proof),
                "--params",
                s(&params),
                "--sender",
                &sender,
            ])
            .assert()
            .failure();
    }
    zdrop()
        .args([
            "state",
            "publish",
            "--db",
            s(&db),
            "--config",
            s(&other_config),
            "--sender",
            &authority,
        ])
        .assert()
        .failure();

    let balance = stdout(zdrop().args(["state", "balance", "--db", s(&db), &sender]));
    assert_eq!(balance, "1000");
}

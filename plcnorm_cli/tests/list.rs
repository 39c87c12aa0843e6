mod common;

use plcnorm_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn list_prints_namespace_tree() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_tc6_project(tmp.path())?;

	common::plcnorm_cmd()
		.arg("list")
		.arg(&input)
		.assert()
		.success()
		.stdout(
			"Line (PLCopen TC6 v2.01)\n  Global [library]\n    Mode (enumeration)\n  PLC1 \
			 [program namespace]\n    Pump (function block)\n      .Start\n  Spare [program \
			 namespace]\n    Idle (program)\n\n3 namespace(s), 2 unit(s)\n",
		);

	Ok(())
}

#[test]
fn list_honors_ignore_patterns() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_tc6_project(tmp.path())?;

	common::plcnorm_cmd()
		.arg("list")
		.arg(&input)
		.args(["--ignore", "PLC*"])
		.assert()
		.success()
		.stdout(
			predicates::str::contains("Spare")
				.and(predicates::str::contains("Pump").not())
				.and(predicates::str::contains("2 namespace(s), 1 unit(s)")),
		);

	Ok(())
}

#[test]
fn list_vendor_project() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let apj = tmp.path().join("Plant.apj");
	std::fs::write(&apj, "<?xml version=\"1.0\"?>\n<Project Version=\"4.12\" />\n")?;
	let program = tmp.path().join("Logical/Cell");
	std::fs::create_dir_all(&program)?;
	std::fs::write(program.join("Cell.prg"), "<?xml version=\"1.0\"?>\n<Program />\n")?;
	std::fs::write(program.join("Cell.var"), "VAR\n\tcount : INT;\nEND_VAR\n")?;
	std::fs::write(
		program.join("Cell.st"),
		"PROGRAM _CYCLIC\n\tcount := count + 1;\nEND_PROGRAM\n",
	)?;

	common::plcnorm_cmd()
		.arg("list")
		.arg(&apj)
		.assert()
		.success()
		.stdout(
			predicates::str::starts_with("Plant (B&R Automation Studio project)")
				.and(predicates::str::contains("Cell [program namespace]"))
				.and(predicates::str::contains("Cell (program)")),
		);

	Ok(())
}

#[test]
fn verbose_logs_to_stderr() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_tc6_project(tmp.path())?;

	common::plcnorm_cmd()
		.arg("--verbose")
		.arg("list")
		.arg(&input)
		.assert()
		.success()
		.stderr(predicates::str::contains("read configuration"));

	Ok(())
}

// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::collections::BTreeMap;
use std::fs::File;

use wavematch::{parse_vcd, LookupError, Pattern, ScopeType, SignalType, Timescale, VCD};

use files::*;

fn load(file_name: &str) -> VCD {
    let file = File::open(file_name).unwrap();
    parse_vcd(file).unwrap()
}

#[test]
fn parse_all_vcds() {
    // see if we can parse all signal trees successfully
    for file_name in FILES {
        let file = File::open(file_name).unwrap();
        let vcd = parse_vcd(file);

        if vcd.is_err() {
            dbg!(file_name);
            vcd.unwrap();
        }
    }
}

#[test]
fn icarus_metadata() {
    let vcd = load("./tests/vcd-files/icarus/testbench.vcd");
    let metadata = vcd.metadata();
    assert_eq!(metadata.date.as_deref(), Some("Mon Feb 22 19:49:29 2021"));
    assert!(metadata.parsed_date.is_some());
    assert_eq!(metadata.version.as_ref().map(|v| v.0.as_str()), Some("Icarus Verilog"));
    assert_eq!(metadata.timescale, (Some(1), Timescale::Ns));
}

#[test]
fn icarus_values() {
    let vcd = load("./tests/vcd-files/icarus/testbench.vcd");
    let testbench = vcd.scope_by_path(&["testbench"]).unwrap();

    let foo = vcd.signal_by_name(testbench, "foo").unwrap();
    assert_eq!(foo.index(), Some("[3:0]"));
    assert_eq!(foo.value_at(0), Ok("0"));
    assert_eq!(foo.value_at(5), Ok("1010"));
    assert_eq!(foo.value_at(1000), Ok("1010"));

    let regfile = vcd.scope_by_path(&["testbench", "dp", "regfile"]).unwrap();
    let r0 = vcd.signal_by_name(regfile, "r0").unwrap();
    assert_eq!(r0.signal_type(), SignalType::Reg);
    assert_eq!(r0.value_at(14), Ok("0"));
    assert_eq!(r0.value_at(15), Ok("1000"));
}

#[test]
fn icarus_aliases() {
    let vcd = load("./tests/vcd-files/icarus/testbench.vcd");
    let clock_paths: [&[&str]; 4] = [
        &["testbench"],
        &["testbench", "dp"],
        &["testbench", "dp", "regfile"],
        &["testbench", "dp", "core"],
    ];
    let clock_names = ["clk", "clock", "clk", "clk"];

    for (path, name) in clock_paths.iter().zip(clock_names) {
        let scope = vcd.scope_by_path(path).unwrap();
        let clock = vcd.signal_by_name(scope, name).unwrap();
        assert_eq!(clock.id_code(), "\"");
        assert_eq!(clock.changes().len(), 6);
        assert_eq!(clock.value_at(12), Ok("0"));
        assert_eq!(clock.value_at(15), Ok("1"));
    }

    let alu = vcd.scope_by_path(&["testbench", "dp", "alu"]).unwrap();
    let out = vcd.signal_by_name(alu, "out").unwrap();
    assert_eq!(out.value_at(15), Ok("1000"));
    assert_eq!(out.value_at(25), Ok("11111110"));
}

#[test]
fn icarus_pre_timeline() {
    let input = "\
$scope module top $end
$var wire 1 ! late $end
$upscope $end
$enddefinitions $end
#7
1!
";
    let vcd = parse_vcd(input.as_bytes()).unwrap();
    let top = vcd.scope_by_path(&["top"]).unwrap();
    let late = vcd.signal_by_name(top, "late").unwrap();
    assert_eq!(
        late.value_at(6),
        Err(LookupError::PreTimeline {
            desired_time: 6,
            timeline_start_time: 7
        })
    );
}

#[test]
fn module_db_against_icarus() {
    let vcd = load("./tests/vcd-files/icarus/testbench.vcd");
    let dp = vcd.scope_by_path(&["testbench", "dp"]).unwrap();

    let file = File::open(MODULE_DB).unwrap();
    let patterns: BTreeMap<String, Pattern> = serde_json::from_reader(file).unwrap();

    let matched = |name: &str| {
        vcd.match_children(dp, &patterns[name])
            .map(|idx| vcd.scope_name_by_idx(idx).to_string())
    };
    assert_eq!(matched("alu").as_deref(), Some("alu"));
    assert_eq!(matched("regfile").as_deref(), Some("regfile"));
    // alu and core both carry an 8 bit `out`, alu is declared first
    assert_eq!(matched("any_with_out").as_deref(), Some("alu"));
    assert_eq!(matched("multiplier"), None);
}

#[test]
fn verilator_nameless_scopes_and_literals() {
    let vcd = load("./tests/vcd-files/verilator/vlt_dump.vcd");
    let metadata = vcd.metadata();
    assert_eq!(metadata.timescale, (Some(1), Timescale::Ps));
    assert!(metadata.parsed_date.is_some());

    let begin = vcd.scope_by_path(&["TOP", "top", ""]).unwrap();
    assert_eq!(vcd.scope(begin).scope_type(), ScopeType::Begin);

    let counter = vcd.scope_by_path(&["TOP", "top", "", "counter"]).unwrap();
    let value = vcd.signal_by_name(counter, "value").unwrap();
    assert_eq!(value.signal_type(), SignalType::SVLogic);
    assert_eq!(value.value_at(0), Ok("0"));
    assert_eq!(value.value_at(35), Ok("10"));
    let last = value.value_at(40).unwrap();
    assert!(last.chars().all(|chr| chr == 'z'));

    let top = vcd.scope_by_path(&["TOP", "top"]).unwrap();
    let ratio = vcd.signal_by_name(top, "ratio").unwrap();
    assert_eq!(ratio.value_at(10), Ok("0.5"));
    assert_eq!(ratio.value_at(30), Ok("1e-3"));
    let state = vcd.signal_by_name(top, "state").unwrap();
    assert_eq!(state.value_at(35), Ok("RUN"));
}

#[test]
fn ghdl_timescale_and_undecoded_dates() {
    let vcd = load("./tests/vcd-files/ghdl/alu.vcd");
    let metadata = vcd.metadata();
    assert_eq!(metadata.timescale, (Some(1), Timescale::Fs));
    assert_eq!(metadata.date.as_deref(), Some("2021-05-17 11:42:07"));
    assert!(metadata.parsed_date.is_none());

    let alu_tb = vcd.scope_by_path(&["alu_tb"]).unwrap();
    let a = vcd.signal_by_name(alu_tb, "a").unwrap();
    assert_eq!(a.value_at(3_000_000), Ok("x"));
    assert_eq!(a.value_at(4_000_000), Ok("111"));

    let uut = vcd.scope_by_path(&["alu_tb", "uut"]).unwrap();
    let res = vcd.signal_by_name(uut, "res").unwrap();
    assert_eq!(res.value_at(0), Ok("U"));
    assert_eq!(res.value_at(2_500_000), Ok("1000"));

    let pattern: Pattern = serde_json::from_str(r#"{"signals": {"opcode": {"size": 4}}}"#).unwrap();
    assert_eq!(vcd.match_children(alu_tb, &pattern), Some(uut));
    assert!(vcd.match_scope(uut, &pattern));
    assert!(!vcd.match_scope(alu_tb, &Pattern::any().with_identifier("uut")));
}

use cmssw_profiling_digest::parser::{normalize_frame, open_stack_dump, parse_samples, read_log_metrics};
use cmssw_profiling_digest::utils::{MetricsError, ParseError};
use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use pretty_assertions::assert_eq;
use std::io::Write;

const TOP_REPORT: &str = "\
Counter: MEM_LIVE

## 1 12.5 '+2048'
#0 edm::PoolOutputModule::write(edm::EventForOutput const&)
#1 edm::OutputModule::doEvent(edm::EventTransitionInfo const&, edm::ActivityRegistry*)

## 2 3.5 '+512'
#0 (anonymous namespace)::Filler::fill(std::vector<int, std::allocator<int> >&)
#1 MyProducer::produce(edm::Event&, edm::EventSetup const&)
#2 edm::stream::EDProducerAdaptorBase::doEvent(edm::EventTransitionInfo const&)
";

#[test]
fn test_anonymous_namespace_removed_once() {
    let frame = normalize_frame("#7 (anonymous namespace)::A::(anonymous namespace)::B::f()", 1)
        .unwrap()
        .unwrap();
    assert_eq!(frame, "A::B::f");
    assert!(!frame.contains("anonymous"));

    let again = normalize_frame(&format!("#7 {}()", frame), 1).unwrap().unwrap();
    assert_eq!(again, frame);
}

#[test]
fn test_parse_top_report() {
    let samples = parse_samples(TOP_REPORT).unwrap();

    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].measurement, 2048.0);
    assert_eq!(
        samples[0].frames,
        vec!["edm::PoolOutputModule::write", "edm::OutputModule::doEvent"]
    );
    assert_eq!(
        samples[1].frames,
        vec![
            "Filler::fill",
            "MyProducer::produce",
            "edm::stream::EDProducerAdaptorBase::doEvent"
        ]
    );
}

#[test]
fn test_open_bzip2_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cpu.txt.bz2");

    let mut encoder = BzEncoder::new(
        std::fs::File::create(&path).unwrap(),
        bzip2::Compression::best(),
    );
    encoder.write_all(TOP_REPORT.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let samples: Vec<_> = open_stack_dump(&path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].measurement, 2048.0);
    assert_eq!(samples[1].frames[0], "Filler::fill");
}

#[test]
fn test_open_gzip_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mem.txt.gz");

    let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
    encoder.write_all(TOP_REPORT.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let samples: Vec<_> = open_stack_dump(&path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[1].measurement, 512.0);
}

#[test]
fn test_open_missing_report() {
    let result = open_stack_dump("/definitely/not/here.txt");
    assert!(matches!(result, Err(ParseError::Io(_))));
}

#[test]
fn test_read_log_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("step3_TimeMemoryInfo.log");
    std::fs::write(
        &path,
        "MemoryCheck: event : VSIZE 900 0 RSS 400.5 0\n\
         MemoryCheck: event : VSIZE 910 0 RSS 420.25 0\n\
         TimeReport       event loop CPU/event = 0.75\n",
    )
    .unwrap();

    let metrics = read_log_metrics(&path).unwrap();
    assert_eq!(metrics.cpu_event, 0.75);
    assert_eq!(metrics.peak_rss, 420.25);
}

#[test]
fn test_read_log_metrics_missing_file() {
    let result = read_log_metrics("/definitely/not/here.log");
    assert!(matches!(result, Err(MetricsError::Io { .. })));
}

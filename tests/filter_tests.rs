use crossbeam_channel::{bounded, unbounded};
use filewalker::filter::{Filter, FilterMethods, FunctionFilter, base_name};
use filewalker::pipeline::CancelToken;
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn build(name: &str, pattern: &str) -> Arc<dyn Filter> {
    FilterMethods::default().build(name, pattern).unwrap()
}

/// Push `paths` through `workers` workers of `filter` and collect what comes out, sorted.
fn run_workers(filter: &Arc<dyn Filter>, paths: &[String], workers: usize) -> Vec<String> {
    let (in_tx, in_rx) = bounded::<String>(workers);
    let (out_tx, out_rx) = bounded::<String>(workers);
    let cancel = CancelToken::new();
    for _ in 0..workers {
        filter.start(in_rx.clone(), out_tx.clone(), cancel.clone());
    }
    drop(in_rx);

    let waiter = {
        let filter = Arc::clone(filter);
        thread::spawn(move || {
            let joined = filter.wait_all().unwrap();
            drop(out_tx);
            joined
        })
    };
    let feeder = {
        let paths = paths.to_vec();
        thread::spawn(move || {
            for p in paths {
                in_tx.send(p).unwrap();
            }
        })
    };

    let mut out: Vec<String> = out_rx.iter().collect();
    feeder.join().unwrap();
    assert_eq!(waiter.join().unwrap(), workers);
    out.sort();
    out
}

// --- base_name ---

#[test]
fn test_base_name() {
    assert_eq!(base_name("a/b/c.txt"), "c.txt");
    assert_eq!(base_name("c.txt"), "c.txt");
    assert_eq!(base_name("/abs/dir/"), "dir");
    assert_eq!(base_name(""), "");
    assert_eq!(base_name("a/.."), "");
}

// --- registry ---

#[test]
fn test_filter_names_sorted() {
    assert_eq!(
        FilterMethods::default().names(),
        vec!["contains", "glob", "path-contains", "prefix", "regex", "suffix"]
    );
}

#[test]
fn test_unknown_filter_lists_names() {
    let err = FilterMethods::default()
        .build("fuzzy", "x")
        .err()
        .unwrap()
        .to_string();
    assert!(err.contains("fuzzy is not a valid filtering method"));
    assert!(err.contains("glob"));
}

#[test]
fn test_custom_registry() {
    fn always(_: &str) -> anyhow::Result<Arc<dyn Filter>> {
        Ok(Arc::new(FunctionFilter::new(|_| true)))
    }
    let methods = FilterMethods::new().with("always", always);
    assert_eq!(methods.names(), vec!["always"]);
    assert!(methods.build("always", "").unwrap().matches("anything"));
    assert!(methods.build("glob", "*").is_err());
}

// --- eager validation ---

#[test]
fn test_glob_invalid_pattern_fails_at_construction() {
    let err = FilterMethods::default().build("glob", "[a-").err().unwrap();
    assert!(format!("{:#}", err).contains("invalid glob pattern"));
}

#[test]
fn test_regex_invalid_pattern_fails_at_construction() {
    let err = FilterMethods::default().build("regex", "(unclosed").err().unwrap();
    assert!(format!("{:#}", err).contains("invalid regex"));
}

// --- variants ---

#[test]
fn test_glob_matches_base_name() {
    let f = build("glob", "*.log");
    assert!(f.matches("b.log"));
    assert!(f.matches("sub/dir/a.log"));
    assert!(!f.matches("a.log.txt"));
    assert!(!f.matches("logs.log/a.txt"));
}

#[test]
fn test_glob_question_and_class() {
    let f = build("glob", "a?.[ch]");
    assert!(f.matches("x/ab.c"));
    assert!(f.matches("a1.h"));
    assert!(!f.matches("abc.c"));
    assert!(!f.matches("ab.o"));
}

#[test]
fn test_glob_star_does_not_cross_separator() {
    let f = build("glob", "a*b");
    assert!(f.matches("dir/axxb"));
    // Base name is "b"; the "a" lives in the parent directory.
    assert!(!f.matches("a/b"));
}

#[test]
fn test_regex_unanchored_full_path() {
    let f = build("regex", r"sub/.*\.log$");
    assert!(f.matches("base/sub/a.log"));
    assert!(!f.matches("base/a.log"));
    let f = build("regex", "ab");
    assert!(f.matches("xxabyy"));
}

#[test]
fn test_path_contains_uses_full_path() {
    let f = build("path-contains", "sub/");
    assert!(f.matches("root/sub/a.txt"));
    assert!(!f.matches("root/a.txt"));
}

#[test]
fn test_contains_uses_base_name() {
    let f = build("contains", "sub");
    assert!(f.matches("root/subway.txt"));
    assert!(!f.matches("sub/a.txt"));
}

#[test]
fn test_suffix_uses_full_path() {
    let f = build("suffix", ".log");
    assert!(f.matches("b.log"));
    assert!(f.matches("sub/a.log"));
    assert!(!f.matches("a.txt"));
    let f = build("suffix", "sub/a.log");
    assert!(f.matches("root/sub/a.log"));
}

#[test]
fn test_prefix_uses_base_name() {
    let f = build("prefix", "a");
    assert!(f.matches("a.txt"));
    assert!(f.matches("sub/a.log"));
    assert!(!f.matches("a/b.log"));
}

// --- property tests: constructed matches pass, constructed non-matches do not ---

proptest! {
    #[test]
    fn prop_glob(dir in "[a-z]{1,6}", prefix in "[a-z]{1,4}", rest in "[a-z0-9.]{0,6}") {
        let f = build("glob", &format!("{prefix}*"));
        let matching = format!("{dir}/{prefix}{rest}");
        let other = format!("{prefix}/Z{rest}");
        prop_assert!(f.matches(&matching));
        prop_assert!(!f.matches(&other));
    }

    #[test]
    fn prop_regex(dir in "[a-m]{1,6}", needle in "[n-z.+]{1,4}", post in "[a-m]{0,4}") {
        let f = build("regex", &regex::escape(&needle));
        let matching = format!("{dir}/{needle}{post}");
        let other = format!("{dir}/{post}a");
        prop_assert!(f.matches(&matching));
        prop_assert!(!f.matches(&other));
    }

    #[test]
    fn prop_path_contains(dir in "[a-m]{1,6}", needle in "[n-z]{1,4}", name in "[a-m]{1,6}") {
        let f = build("path-contains", &needle);
        let matching = format!("{dir}{needle}/{name}");
        let other = format!("{dir}/{name}");
        prop_assert!(f.matches(&matching));
        prop_assert!(!f.matches(&other));
    }

    #[test]
    fn prop_contains(needle in "[n-z]{1,4}", pre in "[a-m]{0,4}", post in "[a-m]{0,4}") {
        let f = build("contains", &needle);
        let matching = format!("dir/{pre}{needle}{post}");
        let in_dir_only = format!("{needle}/{pre}{post}a");
        prop_assert!(f.matches(&matching));
        prop_assert!(!f.matches(&in_dir_only));
    }

    #[test]
    fn prop_suffix(path in "[a-z/]{0,12}", suffix in "[a-z.]{1,5}") {
        let f = build("suffix", &suffix);
        let matching = format!("{path}{suffix}");
        let other = format!("{path}{suffix}Q");
        prop_assert!(f.matches(&matching));
        prop_assert!(!f.matches(&other));
    }

    #[test]
    fn prop_prefix(dir in "[a-z]{0,6}", prefix in "[a-m]{1,4}", rest in "[a-z]{0,6}") {
        let f = build("prefix", &prefix);
        let matching = format!("{dir}/{prefix}{rest}");
        let in_dir_only = format!("{prefix}{dir}/Z{rest}");
        prop_assert!(f.matches(&matching));
        prop_assert!(!f.matches(&in_dir_only));
    }
}

// --- workers ---

#[test]
fn test_worker_count_independence() {
    let paths: Vec<String> = (0..300)
        .map(|i| format!("d{}/f{}.{}", i % 7, i, if i % 3 == 0 { "log" } else { "txt" }))
        .collect();
    let mut expected: Vec<String> = paths.iter().filter(|p| p.ends_with(".log")).cloned().collect();
    expected.sort();

    for workers in [1, 2, 3, 8] {
        let filter = build("suffix", ".log");
        assert_eq!(run_workers(&filter, &paths, workers), expected, "workers = {}", workers);
    }
}

#[test]
fn test_wait_without_workers_errors_instead_of_blocking() {
    let filter = FunctionFilter::new(|_| true);
    assert_eq!(filter.pending(), 0);
    assert!(filter.wait().is_err());
    assert_eq!(filter.wait_all().unwrap(), 0);
}

#[test]
fn test_counted_join() {
    let filter = FunctionFilter::new(|p| p.starts_with('k'));
    let (in_tx, in_rx) = unbounded::<String>();
    let (out_tx, out_rx) = unbounded::<String>();
    let cancel = CancelToken::new();
    for _ in 0..3 {
        filter.start(in_rx.clone(), out_tx.clone(), cancel.clone());
    }
    assert_eq!(filter.pending(), 3);
    in_tx.send("keep".to_string()).unwrap();
    in_tx.send("drop".to_string()).unwrap();
    drop(in_tx);

    filter.wait().unwrap();
    assert_eq!(filter.pending(), 2);
    assert_eq!(filter.wait_all().unwrap(), 2);
    assert!(filter.wait().is_err());

    drop(out_tx);
    assert_eq!(out_rx.iter().collect::<Vec<_>>(), vec!["keep".to_string()]);
}

#[test]
fn test_panicking_predicate_still_signals() {
    let filter = FunctionFilter::new(|p| if p == "boom" { panic!("boom") } else { true });
    let (in_tx, in_rx) = unbounded::<String>();
    let (out_tx, _out_rx) = unbounded::<String>();
    filter.start(in_rx, out_tx, CancelToken::new());
    in_tx.send("boom".to_string()).unwrap();
    drop(in_tx);
    filter.wait().unwrap();
    assert_eq!(filter.pending(), 0);
}

#[test]
fn test_cancel_unblocks_workers_stuck_on_send() {
    let filter: Arc<dyn Filter> = Arc::new(FunctionFilter::new(|_| true));
    let (in_tx, in_rx) = bounded::<String>(16);
    // Nobody reads the output: workers block on send until cancelled.
    let (out_tx, _out_rx) = bounded::<String>(1);
    let cancel = CancelToken::new();
    for _ in 0..2 {
        filter.start(in_rx.clone(), out_tx.clone(), cancel.clone());
    }
    for i in 0..16 {
        in_tx.send(format!("p{i}")).unwrap();
    }

    let (done_tx, done_rx) = bounded(1);
    {
        let filter = Arc::clone(&filter);
        thread::spawn(move || {
            let _ = done_tx.send(filter.wait_all().unwrap());
        });
    }
    thread::sleep(Duration::from_millis(50));
    assert!(done_rx.try_recv().is_err(), "workers should still be blocked");

    cancel.cancel();
    assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)).unwrap(), 2);
}

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use relaunch::watch::{match_paths, normalize_drive_letter};

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

// Absolute paths whose extension is never `js`.
fn non_js_path() -> impl Strategy<Value = PathBuf> {
    (
        proptest::collection::vec(segment(), 0..4),
        segment(),
        prop_oneof![Just("coffee"), Just("txt"), Just("css"), Just("jsx"), Just("json")],
    )
        .prop_map(|(dirs, stem, ext)| {
            let mut p = PathBuf::from("/proj");
            for d in dirs {
                p.push(d);
            }
            p.push(format!("{stem}.{ext}"));
            p
        })
}

proptest! {
    #[test]
    fn batches_of_ignored_paths_never_match(
        paths in proptest::collection::vec(non_js_path(), 1..20)
    ) {
        let rules = vec!["*.js".to_string()];
        let result = match_paths(&paths, &rules, &[]).unwrap();
        prop_assert!(result.is_empty());
        prop_assert_eq!(result.ignored, paths.len());
    }

    #[test]
    fn excluded_directories_never_match(
        paths in proptest::collection::vec(non_js_path(), 1..20)
    ) {
        let inside: Vec<PathBuf> = paths
            .iter()
            .map(|p| Path::new("/proj/vendor").join(p.file_name().unwrap()))
            .collect();
        let rules = vec!["!vendor/**".to_string()];
        let result = match_paths(&inside, &rules, &[]).unwrap();
        prop_assert!(result.is_empty());
    }

    #[test]
    fn drive_letter_normalization_only_touches_the_first_char(
        letter in "[a-z]",
        rest in "[A-Za-z0-9_]{1,12}"
    ) {
        let input = format!(r"{letter}:\{rest}\app.js");
        let out = normalize_drive_letter(Path::new(&input)).to_string_lossy().into_owned();
        prop_assert_eq!(&out[..1], letter.to_uppercase());
        prop_assert_eq!(&out[1..], &input[1..]);
    }
}

use std::io::Write;

use goldenfile::Mint;

use crate::csvimport::CsvImport;
use crate::filespec::{self, FileSpec};
use crate::transaction::date::DateParser;

/// Converts the export at `input_path` and checks the result against
/// `testdata/golden/<golden_path>`.
pub fn golden_test(input_path: &str, account: &str, golden_path: &str) {
    let mut mint = Mint::new("testdata/golden");
    let differ = Box::new(goldenfile::differs::text_diff);
    let mut out = mint
        .new_goldenfile_with_differ(golden_path, differ)
        .expect("new goldenfile");

    let content = filespec::read_file(&FileSpec::Path(input_path.into())).expect("read input");
    let import =
        CsvImport::from_export(&content, account, DateParser::default()).expect("perform import");

    out.write_all(import.render().expect("render").as_bytes())
        .expect("write output");
}

#[macro_export]
macro_rules! assert_text_eq {
    ($want:expr, $got:expr) => {
        let want = $want;
        let got = $got;
        let want_str: &str = want.as_ref();
        let got_str: &str = got.as_ref();
        if want_str != got_str {
            text_diff::assert_diff(want_str, got_str, "\n", 0);
        }
    };
}

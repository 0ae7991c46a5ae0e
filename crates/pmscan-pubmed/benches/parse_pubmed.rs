use pmscan_pubmed::parser::{count_articles, parse_pubmed_xml};

fn load_doc(filename: &str) -> String {
    let dir = std::env::var("BENCH_DATA_DIR")
        .expect("set BENCH_DATA_DIR to directory with sample data files");
    let path = std::path::Path::new(&dir).join(filename);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

#[divan::bench]
fn parse_pubmed_xml_bench(bencher: divan::Bencher) {
    // One complete PubmedArticleSet export
    let doc = load_doc("pubmed_0_to_99.xml");
    bencher.bench(|| parse_pubmed_xml(&doc).unwrap());
}

#[divan::bench]
fn count_articles_bench(bencher: divan::Bencher) {
    let doc = load_doc("pubmed_0_to_99.xml");
    bencher.bench(|| count_articles(&doc).unwrap());
}

fn main() {
    divan::main();
}

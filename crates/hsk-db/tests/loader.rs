use std::path::PathBuf;

use hsk_db::{Dictionary, LoadError, LoadMode, LookupSession, SourceFiles};
use hsk_types::{Level, LookupKind};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("hsk")
}

fn level(n: u8) -> Level {
    Level::new(n).unwrap()
}

#[test]
fn loads_master_and_level_lists() {
    for mode in [LoadMode::Mmap, LoadMode::Owned] {
        let dict = Dictionary::load_dir(fixture_dir(), mode).expect("load fixtures");
        assert_eq!(dict.len(), 15);
        assert_eq!(dict.headword_count(), 15);

        let love = dict.lookup_by_headword("爱").expect("爱 present");
        assert_eq!(love.pronunciation, "ài");
        assert_eq!(love.translations, "любить; любовь");
        assert_eq!(love.examples, "我爱你 - я тебя люблю");
        // listed at levels 1 and 3, the lower one wins
        assert_eq!(love.level, level(1));

        assert_eq!(dict.lookup_by_headword("事").unwrap().level, level(2));
        assert_eq!(dict.lookup_by_headword("马上").unwrap().level, level(3));
        assert_eq!(dict.lookup_by_headword("骂").unwrap().level, Level::UNLEVELED);
    }
}

#[test]
fn counts_words_per_level() {
    let dict = Dictionary::load_dir(fixture_dir(), LoadMode::Owned).unwrap();
    let counts: Vec<usize> = dict.level_counts().into_iter().map(|(_, n)| n).collect();
    assert_eq!(counts, [7, 3, 2, 0, 0, 3]);
}

#[test]
fn parses_the_sample_record() {
    let dict = Dictionary::load_dir(fixture_dir(), LoadMode::Mmap).unwrap();
    let hello = dict.lookup_by_headword("你好").unwrap();
    assert_eq!(hello.pronunciation, "nǐ hǎo");
    assert_eq!(hello.translations, "Привет; здравствуйте");
    assert_eq!(hello.examples, "你好吗？");

    let karaoke = dict.lookup_by_headword("卡拉OK").unwrap();
    assert_eq!(karaoke.pronunciation, "kǎlā");
    assert_eq!(karaoke.translations, "OK караоке (KTV)");
}

#[test]
fn toneless_and_toned_pinyin_differ() {
    let dict = Dictionary::load_dir(fixture_dir(), LoadMode::Mmap).unwrap();
    let mut session = LookupSession::new();
    assert!(session.lookup_by_pinyin(&dict, "nihao").is_none());
    assert_eq!(
        session.lookup_by_toneless_pinyin(&dict, "nihao").unwrap().headword,
        "你好"
    );
    assert_eq!(session.lookup_by_pinyin(&dict, "nǐhǎo").unwrap().headword, "你好");
    assert_eq!(session.lookup_by_toneless_pinyin(&dict, "lü").unwrap().headword, "绿");
}

#[test]
fn cycles_through_homophones() {
    let dict = Dictionary::load_dir(fixture_dir(), LoadMode::Mmap).unwrap();
    let mut session = LookupSession::new();
    let seen: Vec<String> = (0..4)
        .filter_map(|_| session.lookup_by_toneless_pinyin(&dict, "shi"))
        .map(|e| e.headword.clone())
        .collect();
    assert_eq!(seen, ["是", "事", "十", "是"]);

    let hit = session
        .lookup(&dict, LookupKind::Translation, "время")
        .unwrap();
    assert_eq!((hit.entry.headword.as_str(), hit.rank, hit.total), ("时候", 1, 1));
}

#[test]
fn missing_level_lists_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("hskwords6.txt"),
        "1 好 hǎo хорошо\n2 人 rén человек\n",
    )
    .unwrap();
    std::fs::write(tmp.path().join("hskwords2.txt"), "1 人 rén человек\n").unwrap();

    let dict = Dictionary::load_dir(tmp.path(), LoadMode::Mmap).unwrap();
    assert_eq!(dict.lookup_by_headword("人").unwrap().level, level(2));
    assert_eq!(dict.lookup_by_headword("好").unwrap().level, Level::UNLEVELED);
}

#[test]
fn missing_master_list_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = Dictionary::load_dir(tmp.path(), LoadMode::Owned).unwrap_err();
    assert!(err.to_string().contains("hskwords6.txt"));
}

#[test]
fn unknown_headword_in_level_list_fails_the_load() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("hskwords6.txt"), "1 你好 nǐ hǎo Привет\n").unwrap();
    std::fs::write(tmp.path().join("hskwords1.txt"), "1 谢谢 xièxie Спасибо\n").unwrap();

    let err = Dictionary::load_dir(tmp.path(), LoadMode::Mmap).unwrap_err();
    assert!(format!("{err:#}").contains("hskwords1.txt"));
    let load_err = err.downcast_ref::<LoadError>().expect("typed load error");
    assert_eq!(
        load_err,
        &LoadError::UnknownHeadword {
            line: 1,
            sequence: 1,
            headword: "谢谢".into(),
            level: level(1),
        }
    );
}

#[test]
fn custom_file_layout() {
    let tmp = tempfile::tempdir().unwrap();
    let master = tmp.path().join("all.txt");
    let basic = tmp.path().join("basic.txt");
    std::fs::write(&master, "1 好 hǎo хорошо\n").unwrap();
    std::fs::write(&basic, "1 好 hǎo хорошо\n").unwrap();

    let files = SourceFiles {
        primary: master,
        supplements: vec![(level(4), basic)],
    };
    let dict = Dictionary::load_files(&files, LoadMode::Owned).unwrap();
    assert_eq!(dict.lookup_by_headword("好").unwrap().level, level(4));
}

#[test]
fn rejects_invalid_utf8() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("hskwords6.txt"), b"1 \xff\xfe h x\n").unwrap();
    let err = Dictionary::load_dir(tmp.path(), LoadMode::Owned).unwrap_err();
    assert!(err.to_string().contains("UTF-8"));
}

use std::fs;
use std::path::Path;
use guess_the_card::{load_all_messages, parse_lang};

#[test]
fn messages_dir_loads_all_known_languages() {
    // list files under messages/
    let dir = Path::new("messages");
    let mut expected = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for e in entries.flatten() {
            if let Some(fname) = e.file_name().to_str() {
                if fname.to_lowercase().ends_with(".json") {
                    let stem = fname.trim_end_matches(".json");
                    if parse_lang(stem).is_some() {
                        expected.push(stem.to_string());
                    }
                }
            }
        }
    }
    assert!(expected.contains(&"en".to_string()));
    assert!(expected.contains(&"it".to_string()));

    let map = load_all_messages("messages");

    for lang in expected {
        assert!(
            map.contains_key(&lang),
            "messages map missing language: {}",
            lang
        );
    }

    for (k, v) in map.iter() {
        assert!(
            !v.current_language_label.trim().is_empty(),
            "{} missing current_language_label",
            k
        );
        assert!(
            !v.language_name.trim().is_empty(),
            "{} missing language_name",
            k
        );
    }
}

#[test]
fn broken_file_falls_back_to_english_defaults() {
    let dir = std::env::temp_dir().join(format!("guess_messages_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("it.json"), "{ not json").unwrap();
    fs::write(dir.join("xx.json"), "{}").unwrap();

    let map = load_all_messages(dir.to_str().unwrap());
    assert_eq!(map.len(), 1, "unknown language files are skipped");
    assert_eq!(map.get("it").unwrap().language_name, "English");

    let _ = fs::remove_dir_all(&dir);
}

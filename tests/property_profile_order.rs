mod common;

use common::config_dir_with;
use proptest::prelude::*;
use taipan::{ConfigLoader, ProfileList};

const PROFILES: [&str; 5] = ["alpha", "beta", "gamma", "delta", "epsilon"];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: the last profile in the list wins for keys every profile sets
    ///
    /// Keys only one profile sets keep that profile's value, and keys no
    /// profile sets keep the base value.
    #[test]
    fn prop_last_profile_wins(
        order in Just(PROFILES.to_vec()).prop_shuffle(),
        len in 1usize..=PROFILES.len(),
    ) {
        let chosen = &order[..len];

        let mut files: Vec<(String, String)> = vec![(
            "config.yaml".to_string(),
            "winner: base\nuntouched: base\n".to_string(),
        )];
        for profile in PROFILES {
            files.push((
                format!("config-{profile}.yaml"),
                format!("winner: {profile}\nonly:\n  {profile}: {profile}\n"),
            ));
        }
        let borrowed: Vec<(&str, &str)> = files
            .iter()
            .map(|(name, contents)| (name.as_str(), contents.as_str()))
            .collect();
        let dir = config_dir_with(&borrowed);

        let settings = ConfigLoader::new(dir.path())
            .with_profiles(chosen.iter().copied().collect::<ProfileList>())
            .without_local_dir()
            .load()
            .unwrap();

        prop_assert_eq!(settings.get_string("winner").unwrap(), chosen[len - 1]);
        prop_assert_eq!(settings.get_string("untouched").unwrap(), "base");
        for profile in chosen {
            prop_assert_eq!(
                settings.get_string(&format!("only.{profile}")).unwrap(),
                *profile
            );
        }
        for profile in PROFILES.iter().filter(|p| !chosen.contains(*p)) {
            let key = format!("only.{profile}");
            prop_assert!(!settings.contains(&key));
        }
    }

    /// Property: parsing keeps one normalized entry per comma-separated segment, in order
    #[test]
    fn prop_profile_list_preserves_order(
        names in prop::collection::vec("[A-Za-z]{1,8}", 1..6),
        pad in " {0,3}",
    ) {
        let raw = names
            .iter()
            .map(|name| format!("{pad}{name}{pad}"))
            .collect::<Vec<_>>()
            .join(",");

        let parsed = ProfileList::parse(&raw);
        let expected: Vec<String> = names.iter().map(|name| name.to_lowercase()).collect();
        prop_assert_eq!(parsed.as_slice(), expected.as_slice());
    }
}

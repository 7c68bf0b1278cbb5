use crate::errors::{SaveError, SaveResult};
use crate::trainer::Trainer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const SAVE_DIR: &str = "saves";
pub const SAVE_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    pub save_name: String,
    /// Seconds since the Unix epoch at the time of writing.
    pub timestamp: u64,
    pub version: String,
    pub trainer: Trainer,
}

fn save_path(directory: &Path, save_name: &str) -> PathBuf {
    directory.join(format!("{}.json", save_name))
}

/// Write a save file. Best effort: any failure is reported to the caller
/// and never touches the running game state.
pub fn save_game_to(directory: &Path, trainer: &Trainer, save_name: &str) -> SaveResult<PathBuf> {
    fs::create_dir_all(directory)?;

    let save = SaveFile {
        save_name: save_name.to_string(),
        timestamp: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0),
        version: SAVE_VERSION.to_string(),
        trainer: trainer.clone(),
    };

    let path = save_path(directory, save_name);
    let json = serde_json::to_string_pretty(&save)?;
    fs::write(&path, json)?;
    Ok(path)
}

pub fn save_game(trainer: &Trainer, save_name: &str) -> SaveResult<PathBuf> {
    save_game_to(Path::new(SAVE_DIR), trainer, save_name)
}

pub fn load_game_from(directory: &Path, save_name: &str) -> SaveResult<Trainer> {
    let path = save_path(directory, save_name);
    if !path.exists() {
        return Err(SaveError::NotFound(save_name.to_string()));
    }
    let contents = fs::read_to_string(&path)?;
    let save: SaveFile = serde_json::from_str(&contents)?;
    Ok(save.trainer)
}

pub fn load_game(save_name: &str) -> SaveResult<Trainer> {
    load_game_from(Path::new(SAVE_DIR), save_name)
}

/// Names of the saves present in a directory, newest first.
pub fn list_saves_in(directory: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(directory) else {
        return Vec::new();
    };

    let mut saves: Vec<(std::time::SystemTime, String)> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                return None;
            }
            let name = path.file_stem()?.to_str()?.to_string();
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((modified, name))
        })
        .collect();

    saves.sort_by(|a, b| b.0.cmp(&a.0));
    saves.into_iter().map(|(_, name)| name).collect()
}

pub fn list_saves() -> Vec<String> {
    list_saves_in(Path::new(SAVE_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::Pokedex;
    use crate::pokemon::Pokemon;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pokemon-quest-save-test-{}", tag));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = temp_dir("roundtrip");
        let dex = Pokedex::builtin().unwrap();

        let mut trainer = Trainer::new("Red");
        let mut starter = Pokemon::from_species(&dex, "Bulbasaur", 5, false);
        starter.nickname = "Leafy".to_string();
        starter.take_damage(3);
        trainer.add_pokemon(starter, false);
        trainer.inventory.add_item("Great Ball", 2);

        save_game_to(&dir, &trainer, "slot1").unwrap();
        let loaded = load_game_from(&dir, "slot1").unwrap();

        assert_eq!(loaded.name, "Red");
        assert_eq!(loaded.party().len(), 1);
        assert_eq!(loaded.party()[0].nickname, "Leafy");
        assert_eq!(loaded.party()[0].current_hp(), trainer.party()[0].current_hp());
        assert_eq!(loaded.inventory.count("Great Ball"), 2);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_save_reports_not_found() {
        let dir = temp_dir("missing");
        assert!(matches!(
            load_game_from(&dir, "nope"),
            Err(SaveError::NotFound(_))
        ));
    }

    #[test]
    fn saves_are_listed() {
        let dir = temp_dir("list");
        let trainer = Trainer::new("Red");
        save_game_to(&dir, &trainer, "alpha").unwrap();
        save_game_to(&dir, &trainer, "beta").unwrap();

        let saves = list_saves_in(&dir);
        assert_eq!(saves.len(), 2);
        assert!(saves.contains(&"alpha".to_string()));
        assert!(saves.contains(&"beta".to_string()));

        let _ = fs::remove_dir_all(&dir);
    }
}

//! フレーズカタログモジュール
//!
//! 利用者の言い回し（「canilla que gotea」等）を正規カテゴリ（「plomero」等）へ
//! 対応付ける順序付きテーブル。同じ長さの一致は先に登録されたものが勝つため、
//! HashMapではなくVecで順序を保持する。

use crate::error::{Error, Result};
use crate::types::PhraseEntry;
use serde::{Deserialize, Serialize};

/// es-AR 組み込みテーブル（フレーズ, カテゴリ）
///
/// 並び順は同長一致時の優先順位そのもの。追記のみで運用する。
/// 他の語の一部になりやすい短い語（"aire" ⊂ "aires"、"gas" ⊂ "gastos" 等）は単独で登録しない。
const ES_AR_PHRASES: &[(&str, &str)] = &[
    // 冷房・冷蔵
    ("aire acondicionado", "técnico en refrigeración"),
    ("instalar aire", "técnico en refrigeración"),
    ("no enfría", "técnico en refrigeración"),
    ("no enfria", "técnico en refrigeración"),
    ("heladera", "técnico en refrigeración"),
    ("freezer", "técnico en refrigeración"),
    ("refrigeración", "técnico en refrigeración"),
    ("split", "técnico en refrigeración"),
    // 水回り
    ("plomero", "plomero"),
    ("canilla que gotea", "plomero"),
    ("canilla", "plomero"),
    ("gotea", "plomero"),
    ("pérdida de agua", "plomero"),
    ("perdida de agua", "plomero"),
    ("llave de paso", "plomero"),
    ("cañería", "plomero"),
    ("caño roto", "plomero"),
    ("inodoro", "plomero"),
    ("baño tapado", "plomero"),
    ("destapación", "plomero"),
    ("destapar", "plomero"),
    ("tanque de agua", "plomero"),
    // ガス
    ("gasista", "gasista"),
    ("pérdida de gas", "gasista"),
    ("olor a gas", "gasista"),
    ("instalación de gas", "gasista"),
    ("calefón", "gasista"),
    ("calefon", "gasista"),
    ("termotanque", "gasista"),
    ("estufa", "gasista"),
    // 電気
    ("electricista", "electricista"),
    ("cortocircuito", "electricista"),
    ("se corta la luz", "electricista"),
    ("corte de luz", "electricista"),
    ("sin luz", "electricista"),
    ("enchufe", "electricista"),
    ("térmica", "electricista"),
    ("disyuntor", "electricista"),
    ("instalación eléctrica", "electricista"),
    // 自動車
    ("mecánico", "mecánico"),
    ("mecanico", "mecánico"),
    ("el auto no arranca", "mecánico"),
    ("motor", "mecánico"),
    ("frenos", "mecánico"),
    ("embrague", "mecánico"),
    ("service del auto", "mecánico"),
    ("batería del auto", "electricista del automotor"),
    ("bateria del auto", "electricista del automotor"),
    ("goma pinchada", "gomero"),
    ("gomería", "gomero"),
    ("pinchadura", "gomero"),
    // 清掃
    ("limpieza", "limpieza"),
    ("limpieza profunda", "limpieza"),
    ("limpiar", "limpieza"),
    ("limpieza de vidrios", "limpieza"),
    ("empleada doméstica", "limpieza"),
    // 鍵・建具
    ("cerrajero", "cerrajero"),
    ("cerradura", "cerrajero"),
    ("me quedé afuera", "cerrajero"),
    ("llave", "cerrajero"),
    ("vidrio roto", "vidriero"),
    ("vidrio", "vidriero"),
    ("rejas", "herrero"),
    ("portón", "herrero"),
    ("soldadura", "herrero"),
    // 建築・内装
    ("pintor", "pintor"),
    ("pintar", "pintor"),
    ("pintura", "pintor"),
    ("albañil", "albañil"),
    ("humedad", "albañil"),
    ("revoque", "albañil"),
    ("ladrillo", "albañil"),
    ("techo que gotea", "techista"),
    ("goteras", "techista"),
    ("membrana", "techista"),
    ("techo", "techista"),
    ("carpintero", "carpintero"),
    ("mueble", "carpintero"),
    ("placard", "carpintero"),
    // 家電・IT
    ("lavarropas", "técnico en electrodomésticos"),
    ("microondas", "técnico en electrodomésticos"),
    ("electrodoméstico", "técnico en electrodomésticos"),
    ("computadora", "técnico en computación"),
    ("notebook", "técnico en computación"),
    ("impresora", "técnico en computación"),
    ("celular", "técnico en celulares"),
    ("pantalla rota", "técnico en celulares"),
    // 屋外
    ("jardinero", "jardinero"),
    ("jardín", "jardinero"),
    ("cortar el pasto", "jardinero"),
    ("poda", "jardinero"),
    ("pileta", "piletero"),
    ("cucarachas", "fumigador"),
    ("fumigación", "fumigador"),
    ("plagas", "fumigador"),
    ("ratones", "fumigador"),
    // 運搬
    ("mudanza", "fletes y mudanzas"),
    ("flete", "fletes y mudanzas"),
    // 人的サービス
    ("niñera", "niñera"),
    ("cuidar a mi hijo", "niñera"),
    ("cuidado de adultos mayores", "cuidador de adultos mayores"),
    ("acompañante terapéutico", "cuidador de adultos mayores"),
    ("clases de", "profesor particular"),
    ("profesor particular", "profesor particular"),
    ("apoyo escolar", "profesor particular"),
    ("corte de pelo", "peluquero"),
    ("peluquería", "peluquero"),
    ("manicura", "manicura"),
    ("uñas", "manicura"),
    ("paseador", "paseador de perros"),
    ("pasear al perro", "paseador de perros"),
];

/// es-AR 検索補助の除外語
const ES_AR_STOP_WORDS: &[&str] = &[
    "para", "con", "que", "necesito", "busco", "urgente", "quiero", "tengo",
    "alguien", "ayuda", "favor", "donde", "dónde", "cerca", "zona", "hoy",
    "mañana", "barato", "económico", "precio", "presupuesto", "arreglar",
    "reparar", "una", "uno", "los", "las", "del", "por", "mi", "mis", "me",
    "un", "el", "la", "de", "en", "y", "o",
];

/// フレーズカタログ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseCatalog {
    /// フレーズ定義（順序が優先順位）
    #[serde(default)]
    phrases: Vec<PhraseEntry>,
    /// フォールバック時の除外語
    #[serde(default)]
    stop_words: Vec<String>,
}

impl PhraseCatalog {
    /// エントリと除外語から構築（フレーズは小文字化・検証する）
    pub fn new(phrases: Vec<PhraseEntry>, stop_words: Vec<String>) -> Result<Self> {
        let mut catalog = Self::default();
        catalog.merge(&Self { phrases, stop_words })?;
        Ok(catalog)
    }

    /// 組み込みプリセットを取得
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "es-ar" | "ar" | "argentina" => Some(Self::builtin()),
            _ => None,
        }
    }

    /// es-AR 組み込みカタログ
    pub fn builtin() -> Self {
        Self {
            phrases: ES_AR_PHRASES
                .iter()
                .map(|(phrase, category)| PhraseEntry::new(*phrase, *category))
                .collect(),
            stop_words: ES_AR_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Self = serde_json::from_str(json)?;
        Self::new(raw.phrases, raw.stop_words)
    }

    /// 設定をマージ
    ///
    /// - 既存フレーズ: 位置を保ったままカテゴリを上書き
    /// - 新規フレーズ: 末尾に追加
    /// - 除外語: 和集合
    pub fn merge(&mut self, other: &PhraseCatalog) -> Result<()> {
        for entry in &other.phrases {
            let phrase = entry.phrase.trim().to_lowercase();
            let category = entry.category.trim();
            if phrase.is_empty() {
                return Err(Error::Config(format!(
                    "空のフレーズは登録できません（カテゴリ: {}）",
                    entry.category
                )));
            }
            if category.is_empty() {
                return Err(Error::Config(format!(
                    "フレーズ「{}」のカテゴリが空です",
                    phrase
                )));
            }

            match self.phrases.iter_mut().find(|e| e.phrase == phrase) {
                Some(existing) => existing.category = category.to_string(),
                None => self.phrases.push(PhraseEntry::new(phrase, category)),
            }
        }

        for word in &other.stop_words {
            let word = word.trim().to_lowercase();
            if !word.is_empty() && !self.stop_words.contains(&word) {
                self.stop_words.push(word);
            }
        }

        Ok(())
    }

    /// フレーズ定義（カタログ順）
    pub fn entries(&self) -> &[PhraseEntry] {
        &self.phrases
    }

    /// 除外語
    pub fn stop_words(&self) -> &[String] {
        &self.stop_words
    }

    /// 正規カテゴリ一覧（重複除去・初出順）
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for entry in &self.phrases {
            if !seen.contains(&entry.category.as_str()) {
                seen.push(entry.category.as_str());
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_phrases_are_lowercase() {
        let catalog = PhraseCatalog::builtin();
        for entry in catalog.entries() {
            assert_eq!(entry.phrase, entry.phrase.to_lowercase(), "大文字を含む: {}", entry.phrase);
            assert!(!entry.phrase.trim().is_empty());
            assert!(!entry.category.is_empty());
        }
    }

    #[test]
    fn test_builtin_phrases_are_unique() {
        let catalog = PhraseCatalog::builtin();
        let entries = catalog.entries();
        for (i, entry) in entries.iter().enumerate() {
            assert!(
                entries[i + 1..].iter().all(|e| e.phrase != entry.phrase),
                "重複フレーズ: {}",
                entry.phrase
            );
        }
    }

    #[test]
    fn test_from_preset() {
        assert!(PhraseCatalog::from_preset("es-AR").is_some());
        assert!(PhraseCatalog::from_preset("argentina").is_some());
        assert!(PhraseCatalog::from_preset("es-MX").is_none());
    }

    #[test]
    fn test_from_json_lowercases_phrases() {
        let json = r#"{"phrases": [{"phrase": "  Pileta Verde ", "category": "piletero"}]}"#;
        let catalog = PhraseCatalog::from_json(json).unwrap();
        assert_eq!(catalog.entries()[0].phrase, "pileta verde");
        assert!(catalog.stop_words().is_empty());
    }

    #[test]
    fn test_from_json_rejects_empty_phrase() {
        let json = r#"{"phrases": [{"phrase": "  ", "category": "plomero"}]}"#;
        let result = PhraseCatalog::from_json(json);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_json_rejects_empty_category() {
        let json = r#"{"phrases": [{"phrase": "canilla", "category": ""}]}"#;
        assert!(matches!(PhraseCatalog::from_json(json), Err(Error::Config(_))));
    }

    #[test]
    fn test_merge_keeps_position_and_appends() {
        let mut catalog = PhraseCatalog::new(
            vec![
                PhraseEntry::new("canilla", "plomero"),
                PhraseEntry::new("luz", "electricista"),
            ],
            vec!["para".to_string()],
        )
        .unwrap();

        let custom = PhraseCatalog::new(
            vec![
                PhraseEntry::new("canilla", "gasista"),
                PhraseEntry::new("pileta", "piletero"),
            ],
            vec!["Para".to_string(), "che".to_string()],
        )
        .unwrap();

        catalog.merge(&custom).unwrap();

        let phrases: Vec<(&str, &str)> = catalog
            .entries()
            .iter()
            .map(|e| (e.phrase.as_str(), e.category.as_str()))
            .collect();
        assert_eq!(
            phrases,
            vec![("canilla", "gasista"), ("luz", "electricista"), ("pileta", "piletero")]
        );
        assert_eq!(catalog.stop_words(), &["para".to_string(), "che".to_string()]);
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let catalog = PhraseCatalog::builtin();
        let categories = catalog.categories();
        assert_eq!(categories[0], "técnico en refrigeración");
        assert_eq!(categories[1], "plomero");
        assert!(categories.contains(&"limpieza"));
        for (i, category) in categories.iter().enumerate() {
            assert!(!categories[i + 1..].contains(category), "重複カテゴリ: {}", category);
        }
    }
}

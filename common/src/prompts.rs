//! プロンプト生成モジュール
//!
//! 外部AIサービス（検索語の補正・入力候補）に渡すプロンプトを組み立てる。
//! 利用者向けサービスに合わせ、プロンプト本文はスペイン語（es-AR）。

use crate::catalog::PhraseCatalog;

/// 補正プロンプト生成
///
/// # Arguments
/// * `query` - 利用者の入力
/// * `catalog` - 正規カテゴリの一覧を提供するカタログ
///
/// # Returns
/// `{"enhancedQuery": ...}` 形式の出力を求めるプロンプト
pub fn build_enhance_prompt(query: &str, catalog: &PhraseCatalog) -> String {
    let categories = catalog.categories().join(", ");

    format!(
        r#"Sos el buscador de un directorio de profesionales de servicios en Argentina.
Convertí el pedido del usuario en la categoría de profesional más adecuada.

## Categorías disponibles
{categories}

## Reglas
- Elegí una sola categoría de la lista si corresponde
- Si ninguna corresponde, devolvé una búsqueda breve (máximo 3 palabras) en minúsculas
- Si no podés mejorar la búsqueda, devolvé null
- Respondé SOLO con JSON, sin explicaciones

## Formato de salida
{{"enhancedQuery": "categoría o búsqueda breve"}}

Pedido del usuario:
{query}"#
    )
}

/// 入力候補プロンプト生成
///
/// # Arguments
/// * `partial` - 入力途中の文字列
/// * `limit` - 候補の最大件数
pub fn build_suggest_prompt(partial: &str, limit: usize) -> String {
    format!(
        r#"Sos el autocompletado de un directorio de profesionales de servicios en Argentina.
Sugerí hasta {limit} búsquedas completas que empiecen o continúen el texto del usuario.

## Reglas
- Español rioplatense, en minúsculas
- Cada sugerencia describe un servicio o un problema concreto
- Respondé SOLO con un array JSON de strings, sin explicaciones

## Formato de salida
["sugerencia 1", "sugerencia 2"]

Texto del usuario:
{partial}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_enhance_prompt_lists_categories() {
        let catalog = PhraseCatalog::builtin();
        let prompt = build_enhance_prompt("se me rompió la heladera", &catalog);
        assert!(prompt.contains("se me rompió la heladera"));
        assert!(prompt.contains("técnico en refrigeración"));
        assert!(prompt.contains("plomero"));
        assert!(prompt.contains(r#"{"enhancedQuery": "#));
    }

    #[test]
    fn test_build_suggest_prompt() {
        let prompt = build_suggest_prompt("pint", 5);
        assert!(prompt.contains("hasta 5 búsquedas"));
        assert!(prompt.ends_with("pint"));
    }
}

//! The built-in catalogs shipped with the app.

use rust_decimal::Decimal;

use respira_types::{DifficultyTier, Item, ItemId, ItemKind, Mission, MissionId};

use crate::catalog::{CatalogError, Catalogs, ItemCatalog, MissionCatalog};

/// Key of the free background every user owns.
pub const DEFAULT_BACKGROUND: &str = "bg_default";

struct MissionRow {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    points: i64,
    difficulty: DifficultyTier,
    icon: &'static str,
    color: &'static str,
    duration: Option<&'static str>,
}

const MISSIONS: &[MissionRow] = &[
    MissionRow {
        id: "banho_flash",
        title: "Banho Flash",
        description: "Tome um banho de no máximo 5 minutos.",
        points: 80,
        difficulty: DifficultyTier::Easy,
        icon: "shower",
        color: "green",
        duration: Some("5 min"),
    },
    MissionRow {
        id: "luz_apagada",
        title: "Luz Apagada",
        description: "Passe a noite com as luzes apagadas e aproveite a luz natural/velas.",
        points: 50,
        difficulty: DifficultyTier::Easy,
        icon: "moon",
        color: "green",
        duration: Some("1 noite"),
    },
    MissionRow {
        id: "adeus_vampiros",
        title: "Adeus, Vampiros",
        description: "Tire da tomada todos os eletrônicos que não estão em uso.",
        points: 60,
        difficulty: DifficultyTier::Easy,
        icon: "plug",
        color: "green",
        duration: None,
    },
    MissionRow {
        id: "limpeza_digital",
        title: "Limpeza Digital",
        description: "Apague 50 e-mails antigos ou desnecessários.",
        points: 40,
        difficulty: DifficultyTier::Easy,
        icon: "trash",
        color: "green",
        duration: None,
    },
    MissionRow {
        id: "zero_plastico",
        title: "Zero Plástico",
        description: "Passe o dia inteiro sem comprar ou usar garrafas/copos plásticos descartáveis.",
        points: 150,
        difficulty: DifficultyTier::Medium,
        icon: "recycle",
        color: "orange",
        duration: Some("24h"),
    },
    MissionRow {
        id: "compre_local",
        title: "Compre Local",
        description: "Compre frutas ou vegetais em uma feira de produtores locais.",
        points: 200,
        difficulty: DifficultyTier::Medium,
        icon: "shopping-basket",
        color: "orange",
        duration: None,
    },
    MissionRow {
        id: "sobra_zero",
        title: "Sobra Zero",
        description: "Cozinhe uma refeição utilizando sobras ou talos que iriam para o lixo.",
        points: 180,
        difficulty: DifficultyTier::Medium,
        icon: "utensils",
        color: "orange",
        duration: None,
    },
    MissionRow {
        id: "sacola_retornavel",
        title: "Sacola Retornável",
        description: "Vá ao mercado e recuse sacolas plásticas, usando sua própria ecobag.",
        points: 120,
        difficulty: DifficultyTier::Medium,
        icon: "shopping-bag",
        color: "orange",
        duration: None,
    },
    MissionRow {
        id: "desafio_carona",
        title: "Desafio da Carona",
        description: "Organize uma carona solidária para o trabalho ou faculdade.",
        points: 300,
        difficulty: DifficultyTier::Hard,
        icon: "car-side",
        color: "red",
        duration: None,
    },
    MissionRow {
        id: "moda_circular",
        title: "Moda Circular",
        description: "Conserte uma roupa rasgada ou compre uma peça em brechó.",
        points: 350,
        difficulty: DifficultyTier::Hard,
        icon: "tshirt",
        color: "red",
        duration: None,
    },
    MissionRow {
        id: "dia_vegano",
        title: "Dia Vegano Completo",
        description: "Não consuma nenhum produto de origem animal por 24h.",
        points: 400,
        difficulty: DifficultyTier::Hard,
        icon: "carrot",
        color: "red",
        duration: Some("24h"),
    },
    MissionRow {
        id: "plantio_amigo",
        title: "Plantio Amigo",
        description: "Plante uma árvore ou comece uma pequena horta em casa.",
        points: 500,
        difficulty: DifficultyTier::Hard,
        icon: "seedling",
        color: "red",
        duration: None,
    },
];

const ITEMS: &[(&str, ItemKind, &str, i64)] = &[
    ("glasses", ItemKind::Accessory, "Óculos Cool", 200),
    ("hat", ItemKind::Accessory, "Boné Radical", 350),
    ("bg_purple", ItemKind::Background, "Nebulosa", 500),
    (DEFAULT_BACKGROUND, ItemKind::Background, "Original", 0),
];

/// The twelve built-in missions, easiest first.
pub fn starting_missions() -> Vec<Mission> {
    MISSIONS
        .iter()
        .map(|row| Mission {
            id: MissionId::from(row.id),
            title: row.title.to_owned(),
            description: row.description.to_owned(),
            point_reward: Decimal::new(row.points, 0),
            difficulty: row.difficulty,
            icon: row.icon.to_owned(),
            color_tag: row.color.to_owned(),
            duration: row.duration.map(str::to_owned),
        })
        .collect()
}

/// The built-in shop items.
pub fn starting_items() -> Vec<Item> {
    ITEMS
        .iter()
        .map(|&(id, kind, name, price)| Item {
            id: ItemId::from(id),
            kind,
            display_name: name.to_owned(),
            price: Decimal::new(price, 0),
        })
        .collect()
}

/// Both built-in catalogs, validated.
///
/// # Errors
///
/// Returns [`CatalogError`] only if the built-in tables are inconsistent.
pub fn starting_catalogs() -> Result<Catalogs, CatalogError> {
    Ok(Catalogs {
        missions: MissionCatalog::new(starting_missions())?,
        items: ItemCatalog::new(starting_items(), ItemId::from(DEFAULT_BACKGROUND))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_catalogs_are_valid() {
        let catalogs = starting_catalogs();
        assert!(catalogs.is_ok());
        let Ok(catalogs) = catalogs else { return };
        assert_eq!(catalogs.missions.len(), 12);
        assert_eq!(catalogs.items.len(), 4);
        assert_eq!(catalogs.items.default_background().as_str(), "bg_default");
    }

    #[test]
    fn four_missions_per_tier() {
        let catalogs = starting_catalogs();
        let Ok(catalogs) = catalogs else { return };
        for tier in [DifficultyTier::Easy, DifficultyTier::Medium, DifficultyTier::Hard] {
            assert_eq!(catalogs.missions.by_difficulty(tier).count(), 4);
        }
    }

    #[test]
    fn shop_prices_match_the_app() {
        let catalogs = starting_catalogs();
        let Ok(catalogs) = catalogs else { return };
        let price = |id: &str| catalogs.items.get(&ItemId::from(id)).map(|i| i.price);
        assert_eq!(price("glasses"), Some(Decimal::new(200, 0)));
        assert_eq!(price("hat"), Some(Decimal::new(350, 0)));
        assert_eq!(price("bg_purple"), Some(Decimal::new(500, 0)));
        assert_eq!(price("bg_default"), Some(Decimal::ZERO));
    }
}

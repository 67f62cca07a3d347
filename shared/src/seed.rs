//! Initial catalog
//!
//! Written to the catalog store the first time the book list is empty.

use rust_decimal::Decimal;

use crate::models::{Book, PublicationStatus, SalesStatus};

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}

/// The three books every fresh catalog starts with
pub fn seed_books() -> Vec<Book> {
    vec![
        Book {
            id: "1".into(),
            title: "風の谷の物語".into(),
            author: "山田花子".into(),
            description: "美しい風景と心温まる人々の物語。四季折々の自然が織りなす、忘れられない感動作。"
                .into(),
            full_description:
                "美しい風景と心温まる人々の物語。四季折々の自然が織りなす、忘れられない感動作。"
                    .into(),
            image_url: None,
            price: Decimal::new(1800, 0),
            status: SalesStatus::Available,
            tags: tags(&["文学", "日本文学", "自然"]),
            publication_year: 2023,
            publication_status: PublicationStatus::Published,
        },
        Book {
            id: "2".into(),
            title: "星空を駆ける少年".into(),
            author: "佐藤太一".into(),
            description: "宇宙に憧れる少年の冒険譚。友情と挑戦の物語。".into(),
            full_description:
                "宇宙に憧れる少年が仲間とともにロケットを作り、未知の世界へ挑む感動のストーリー。"
                    .into(),
            image_url: None,
            price: Decimal::new(2200, 0),
            status: SalesStatus::ComingSoon,
            tags: tags(&["SF", "冒険"]),
            publication_year: 2024,
            publication_status: PublicationStatus::Draft,
        },
        Book {
            id: "3".into(),
            title: "珈琲店の午後".into(),
            author: "中村絵里".into(),
            description: "下町の小さな珈琲店を舞台にしたヒューマンドラマ。".into(),
            full_description: "珈琲の香りと人々の想いが交差する、優しく温かな連作短編集。".into(),
            image_url: None,
            price: Decimal::new(1500, 0),
            status: SalesStatus::Available,
            tags: tags(&["ヒューマン", "短編"]),
            publication_year: 2021,
            publication_status: PublicationStatus::Published,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn seed_books_are_valid_and_unique() {
        let books = seed_books();
        assert_eq!(books.len(), 3);
        assert!(books.validate().is_ok());
        let ids: Vec<_> = books.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }
}

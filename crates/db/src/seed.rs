//! Hard-coded sample data for the demo stores.

use chrono::NaiveDate;

use crate::models::book::BookRecord;
use crate::models::sale::SaleRecord;

/// `(author, title, published, price, used)`
const BOOKS: &[(&str, &str, (i32, u32, u32), f64, bool)] = &[
    ("Frank Herbert", "Dune", (1965, 8, 1), 9.99, false),
    ("Jane Austen", "Emma", (1815, 12, 23), 4.5, true),
    ("J. R. R. Tolkien", "The Hobbit", (1937, 9, 21), 12.0, false),
    (
        "Ursula K. Le Guin",
        "The Left Hand of Darkness",
        (1969, 3, 1),
        8.75,
        false,
    ),
    ("Mary Shelley", "Frankenstein", (1818, 1, 1), 3.2, true),
    ("Jane Austen", "Persuasion", (1817, 12, 20), 5.0, false),
    (
        "Italo Calvino",
        "Invisible Cities",
        (1972, 11, 1),
        11.4,
        false,
    ),
    ("Toni Morrison", "Beloved", (1987, 9, 2), 13.9, false),
    ("Frank Herbert", "Dune Messiah", (1969, 10, 15), 9.5, true),
    ("Octavia E. Butler", "Kindred", (1979, 6, 1), 10.25, false),
];

/// `(book_key, copies, sold_on)`
const SALES: &[(i64, i64, (i32, u32, u32))] = &[
    (1, 12, (2024, 1, 5)),
    (3, 7, (2024, 1, 9)),
    (8, 4, (2024, 1, 17)),
    (1, 3, (2024, 2, 2)),
    (10, 15, (2024, 2, 14)),
    (4, 6, (2024, 2, 20)),
    (3, 9, (2024, 3, 3)),
    (2, 2, (2024, 3, 8)),
    (7, 5, (2024, 3, 21)),
    (3, 11, (2024, 4, 1)),
];

fn date((y, m, d): (i32, u32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

/// Sample books, keyed `1..=n` in declaration order.
pub fn sample_books() -> Vec<BookRecord> {
    BOOKS
        .iter()
        .zip(1..)
        .map(|(row, book_key)| {
            let &(author, title, published, price, used) = row;
            BookRecord {
                book_key,
                author: author.to_string(),
                title: title.to_string(),
                publish_date: date(published),
                price,
                used,
            }
        })
        .collect()
}

/// Sample sales referring to [`sample_books`] keys.
pub fn sample_sales() -> Vec<SaleRecord> {
    SALES
        .iter()
        .filter_map(|&(book_key, copies, sold_on)| {
            Some(SaleRecord {
                book_key,
                copies,
                sold_on: date(sold_on)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_books_have_sequential_keys() {
        let books = sample_books();
        assert_eq!(books.len(), BOOKS.len());
        for (i, book) in books.iter().enumerate() {
            assert_eq!(book.book_key, i as i64 + 1);
            assert!(book.publish_date.is_some());
        }
    }

    #[test]
    fn sample_sales_reference_known_books() {
        let keys: Vec<i64> = sample_books().iter().map(|b| b.book_key).collect();
        let sales = sample_sales();
        assert_eq!(sales.len(), SALES.len());
        assert!(sales.iter().all(|s| keys.contains(&s.book_key)));
    }
}

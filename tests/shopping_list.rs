use recipe_book_api::shopping::{CartLine, ShoppingListItem, aggregate, render_text};

fn line(name: &str, unit: &str, amount: i32) -> CartLine {
    CartLine {
        name: name.into(),
        measurement_unit: unit.into(),
        amount,
    }
}

#[test]
fn amounts_are_summed_per_name_and_unit() {
    let items = aggregate(vec![
        line("sugar", "g", 100),
        line("flour", "g", 200),
        line("sugar", "g", 50),
        line("sugar", "tbsp", 2),
    ]);

    assert_eq!(
        items,
        vec![
            ShoppingListItem {
                name: "flour".into(),
                measurement_unit: "g".into(),
                total_amount: 200,
            },
            ShoppingListItem {
                name: "sugar".into(),
                measurement_unit: "g".into(),
                total_amount: 150,
            },
            ShoppingListItem {
                name: "sugar".into(),
                measurement_unit: "tbsp".into(),
                total_amount: 2,
            },
        ]
    );
}

#[test]
fn totals_do_not_overflow_row_width() {
    let items = aggregate(vec![
        line("water", "ml", i32::MAX),
        line("water", "ml", i32::MAX),
    ]);
    assert_eq!(items[0].total_amount, 2 * i64::from(i32::MAX));
}

#[test]
fn empty_cart_renders_placeholder() {
    assert!(aggregate(Vec::new()).is_empty());
    assert_eq!(render_text(&[]), "Shopping list\n\n(empty)\n");
}

#[test]
fn text_rendering_numbers_each_line() {
    let items = aggregate(vec![line("milk", "ml", 300), line("eggs", "pcs", 3)]);
    assert_eq!(
        render_text(&items),
        "Shopping list\n\n1. eggs (pcs) - 3\n2. milk (ml) - 300\n"
    );
}

use std::io;

use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use kunafa::{
    catalog::{Catalog, Category, Product, Size},
    pricing::format_plain,
};

use super::CommandError;

/// Which products the menu lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct MenuFilter {
    pub category: Option<Category>,
    pub featured: bool,
}

impl MenuFilter {
    fn matches(self, product: &Product) -> bool {
        self.category.is_none_or(|category| product.category == category)
            && (!self.featured || product.featured)
    }
}

/// Print the menu as a table with one price column per size.
pub(crate) fn write_menu(
    out: &mut impl io::Write,
    catalog: &Catalog,
    filter: MenuFilter,
    currency_label: &str,
) -> Result<(), CommandError> {
    let mut builder = Builder::default();

    let mut header = vec![
        "id".to_string(),
        "المنتج".to_string(),
        "التصنيف".to_string(),
    ];
    header.extend(Size::ALL.iter().map(|size| size.label().to_string()));
    header.push("مميز".to_string());
    builder.push_record(header);

    let mut rows = 0_usize;

    for (_, product) in catalog.iter().filter(|(_, product)| filter.matches(product)) {
        let mut record = vec![
            product.id.to_string(),
            product.name.clone(),
            product.category.label().to_string(),
        ];
        record.extend(
            product
                .prices
                .iter()
                .map(|(_, price)| format!("{} {currency_label}", format_plain(&price))),
        );
        record.push(if product.featured { "★" } else { "" }.to_string());

        builder.push_record(record);
        rows += 1;
    }

    if rows == 0 {
        writeln!(out, "no products match")?;

        return Ok(());
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

use super::domain::Category;

/// Map a greenness category to its carbon-credit point value.
///
/// Total over [`Category`]: every variant is matched explicitly so adding a
/// category without deciding its points is a compile error, not a silent zero.
pub fn points_for(category: Category) -> u32 {
    match category {
        Category::High => 100,
        Category::Moderate => 50,
        Category::Low => 10,
    }
}

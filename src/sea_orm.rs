use crate::predicate::{Clause, Column, Predicate};
use crate::store::entity::card;
use sea_orm::{
    sea_query::{Alias, Expr, Func, IntoCondition, LikeExpr},
    Condition,
};

const LIKE_ESCAPE: char = '\\';

/// Translate a predicate into a condition on the `cards` table.
///
/// The owner scope is not part of the condition, the store applies it when joining the
/// collection.
pub fn translate_predicate(predicate: &Predicate) -> Condition {
    let mut result = Condition::all();
    for clause in predicate.clauses() {
        result = result.add(translate_clause(clause));
    }
    result
}

/// Translate a single clause into a condition.
pub fn translate_clause(clause: &Clause) -> Condition {
    match clause {
        Clause::Contains { column, value } => column_expr(*column)
            .like(substring(value))
            .into_condition(),
        Clause::Lacks { column, value } => column_expr(*column)
            .not_like(substring(value))
            .into_condition(),
        Clause::MultiColor => Expr::expr(
            Func::cust(Alias::new("LENGTH"))
                .arg(Expr::col((card::Entity, card::Column::Colors))),
        )
        .gt(1)
        .into_condition(),
    }
}

fn column_expr(column: Column) -> Expr {
    Expr::col((card::Entity, translate_column(column)))
}

/// A `LIKE` pattern matching `value` anywhere, with wildcards in `value` escaped.
fn substring(value: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');

    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

pub fn translate_column(column: Column) -> card::Column {
    match column {
        Column::Name => card::Column::Name,
        Column::TypeLine => card::Column::TypeLine,
        Column::OracleText => card::Column::OracleText,
        Column::Colors => card::Column::Colors,
        Column::SetCode => card::Column::SetCode,
        Column::ManaCost => card::Column::ManaCost,
    }
}

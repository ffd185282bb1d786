use crate::db::postgres::DbPools;

#[derive(Clone)]
pub struct SqlxImageRepo {
    pub pools: DbPools,
}

#[derive(Clone)]
pub struct SqlxVisitorRepo {
    pub pools: DbPools,
}

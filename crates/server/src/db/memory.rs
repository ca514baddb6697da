//! In-memory storage backend.
//!
//! All tables sit behind one `tokio::sync::RwLock`, so every repository call
//! is atomic and concurrent mutations serialise in lock order. Tables are
//! `IndexMap`s so listings come back in insertion order, like the
//! `ORDER BY created_at` of the `PostgreSQL` backend.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use pet_store_core::{CartId, ProductId, ProductStockId, StockId, StoreId, UserId};

use super::{
    CartRepository, ProductRepository, RepositoryError, StockRepository, Storage, StoreRepository,
    UserRepository,
};
use crate::models::{Cart, CartLine, Product, ProductStock, Stock, Store, User};

#[derive(Debug, Default)]
struct Tables {
    stores: IndexMap<StoreId, Store>,
    stocks: IndexMap<StockId, Stock>,
    product_stocks: IndexMap<ProductStockId, ProductStock>,
    products: IndexMap<ProductId, Product>,
    users: IndexMap<UserId, User>,
    carts: IndexMap<CartId, Cart>,
}

impl Tables {
    /// Remove a product stock and every cart line pointing at it.
    fn remove_product_stock(&mut self, id: &ProductStockId) -> bool {
        if self.product_stocks.shift_remove(id).is_none() {
            return false;
        }
        for cart in self.carts.values_mut() {
            cart.lines.retain(|line| &line.product_stock_id != id);
        }
        true
    }

    fn product_stock_ids_where(&self, pred: impl Fn(&ProductStock) -> bool) -> Vec<ProductStockId> {
        self.product_stocks
            .values()
            .filter(|row| pred(row))
            .map(|row| row.id.clone())
            .collect()
    }
}

/// Process-local storage. Data is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreRepository for MemoryStorage {
    async fn list_stores(&self) -> Result<Vec<Store>, RepositoryError> {
        Ok(self.tables.read().await.stores.values().cloned().collect())
    }

    async fn find_store(&self, id: &StoreId) -> Result<Option<Store>, RepositoryError> {
        Ok(self.tables.read().await.stores.get(id).cloned())
    }

    async fn insert_store(&self, store: &Store) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.stores.contains_key(&store.id) {
            return Err(RepositoryError::Conflict(format!(
                "store {} already exists",
                store.id
            )));
        }
        let mut fresh = store.clone();
        fresh.stocks.clear();
        tables.stores.insert(fresh.id.clone(), fresh);
        Ok(())
    }

    async fn update_store(&self, store: &Store) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .stores
            .get_mut(&store.id)
            .ok_or(RepositoryError::NotFound)?;
        let stocks = std::mem::take(&mut existing.stocks);
        *existing = Store {
            stocks,
            ..store.clone()
        };
        Ok(())
    }

    async fn delete_store(&self, id: &StoreId) -> Result<(), RepositoryError> {
        self.tables
            .write()
            .await
            .stores
            .shift_remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn attach_stock(
        &self,
        store_id: &StoreId,
        stock_id: &StockId,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.stocks.contains_key(stock_id) {
            return Err(RepositoryError::NotFound);
        }
        let store = tables
            .stores
            .get_mut(store_id)
            .ok_or(RepositoryError::NotFound)?;
        if store.stocks.insert(stock_id.clone()) {
            Ok(())
        } else {
            Err(RepositoryError::Conflict(format!(
                "stock {stock_id} is already associated with store {store_id}"
            )))
        }
    }

    async fn detach_stock(
        &self,
        store_id: &StoreId,
        stock_id: &StockId,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .stores
            .get_mut(store_id)
            .is_some_and(|store| store.stocks.shift_remove(stock_id)))
    }
}

#[async_trait]
impl StockRepository for MemoryStorage {
    async fn list_stocks(&self) -> Result<Vec<Stock>, RepositoryError> {
        Ok(self.tables.read().await.stocks.values().cloned().collect())
    }

    async fn find_stock(&self, id: &StockId) -> Result<Option<Stock>, RepositoryError> {
        Ok(self.tables.read().await.stocks.get(id).cloned())
    }

    async fn find_stocks(&self, ids: &[StockId]) -> Result<Vec<Stock>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.stocks.get(id).cloned())
            .collect())
    }

    async fn insert_stock(&self, stock: &Stock) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.stocks.contains_key(&stock.id) {
            return Err(RepositoryError::Conflict(format!(
                "stock {} already exists",
                stock.id
            )));
        }
        tables.stocks.insert(stock.id.clone(), stock.clone());
        Ok(())
    }

    async fn update_stock(&self, stock: &Stock) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .stocks
            .get_mut(&stock.id)
            .ok_or(RepositoryError::NotFound)?;
        *existing = stock.clone();
        Ok(())
    }

    async fn delete_stock(&self, id: &StockId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.stocks.shift_remove(id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        for store in tables.stores.values_mut() {
            store.stocks.shift_remove(id);
        }
        for row_id in tables.product_stock_ids_where(|row| &row.stock_id == id) {
            tables.remove_product_stock(&row_id);
        }
        Ok(())
    }

    async fn list_product_stocks(
        &self,
        stock_id: &StockId,
    ) -> Result<Vec<ProductStock>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .product_stocks
            .values()
            .filter(|row| &row.stock_id == stock_id)
            .cloned()
            .collect())
    }

    async fn find_product_stock(
        &self,
        id: &ProductStockId,
    ) -> Result<Option<ProductStock>, RepositoryError> {
        Ok(self.tables.read().await.product_stocks.get(id).cloned())
    }

    async fn find_product_stock_for(
        &self,
        stock_id: &StockId,
        product_id: &ProductId,
    ) -> Result<Option<ProductStock>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .product_stocks
            .values()
            .find(|row| &row.stock_id == stock_id && &row.product_id == product_id)
            .cloned())
    }

    async fn save_product_stock(&self, row: &ProductStock) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.stocks.contains_key(&row.stock_id)
            || !tables.products.contains_key(&row.product_id)
        {
            return Err(RepositoryError::NotFound);
        }
        let duplicate = tables.product_stocks.values().any(|other| {
            other.id != row.id
                && other.stock_id == row.stock_id
                && other.product_id == row.product_id
        });
        if duplicate {
            return Err(RepositoryError::Conflict(format!(
                "stock {} already holds product {}",
                row.stock_id, row.product_id
            )));
        }
        tables.product_stocks.insert(row.id.clone(), row.clone());
        Ok(())
    }

    async fn delete_product_stock(&self, id: &ProductStockId) -> Result<bool, RepositoryError> {
        Ok(self.tables.write().await.remove_product_stock(id))
    }
}

#[async_trait]
impl ProductRepository for MemoryStorage {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.tables.read().await.products.values().cloned().collect())
    }

    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.tables.read().await.products.get(id).cloned())
    }

    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.products.contains_key(&product.id) {
            return Err(RepositoryError::Conflict(format!(
                "product {} already exists",
                product.id
            )));
        }
        tables.products.insert(product.id.clone(), product.clone());
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .products
            .get_mut(&product.id)
            .ok_or(RepositoryError::NotFound)?;
        *existing = product.clone();
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.products.shift_remove(id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        for row_id in tables.product_stock_ids_where(|row| &row.product_id == id) {
            tables.remove_product_stock(&row_id);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStorage {
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn insert_user(&self, user: &User, cart: &Cart) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|other| other.username == user.username)
        {
            return Err(RepositoryError::Conflict("username already exists".to_owned()));
        }
        if tables.users.contains_key(&user.id) {
            return Err(RepositoryError::Conflict(format!(
                "user {} already exists",
                user.id
            )));
        }
        tables.users.insert(user.id.clone(), user.clone());
        tables.carts.insert(cart.id.clone(), cart.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|other| other.id != user.id && other.username == user.username)
        {
            return Err(RepositoryError::Conflict("username already exists".to_owned()));
        }
        let existing = tables
            .users
            .get_mut(&user.id)
            .ok_or(RepositoryError::NotFound)?;
        *existing = user.clone();
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.users.shift_remove(id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        tables.carts.retain(|_, cart| &cart.user_id != id);
        for stock in tables.stocks.values_mut() {
            if stock.manager.as_ref() == Some(id) {
                stock.manager = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CartRepository for MemoryStorage {
    async fn find_cart(&self, id: &CartId) -> Result<Option<Cart>, RepositoryError> {
        Ok(self.tables.read().await.carts.get(id).cloned())
    }

    async fn find_cart_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .carts
            .values()
            .find(|cart| &cart.user_id == user_id)
            .cloned())
    }

    async fn save_cart_line(
        &self,
        cart_id: &CartId,
        line: &CartLine,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.product_stocks.contains_key(&line.product_stock_id) {
            return Err(RepositoryError::NotFound);
        }
        let cart = tables
            .carts
            .get_mut(cart_id)
            .ok_or(RepositoryError::NotFound)?;
        match cart
            .lines
            .iter_mut()
            .find(|existing| existing.product_stock_id == line.product_stock_id)
        {
            Some(existing) => existing.count = line.count,
            None => cart.lines.push(line.clone()),
        }
        Ok(())
    }

    async fn delete_cart_line(
        &self,
        cart_id: &CartId,
        product_stock_id: &ProductStockId,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(cart) = tables.carts.get_mut(cart_id) else {
            return Ok(false);
        };
        let before = cart.lines.len();
        cart.lines
            .retain(|line| &line.product_stock_id != product_stock_id);
        Ok(cart.lines.len() != before)
    }

    async fn clear_cart(&self, cart_id: &CartId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let cart = tables
            .carts
            .get_mut(cart_id)
            .ok_or(RepositoryError::NotFound)?;
        cart.lines.clear();
        Ok(())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

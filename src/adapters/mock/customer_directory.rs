use crate::domain::value_objects::CustomerId;
use crate::ports::customer_directory::{CustomerDirectory as CustomerDirectoryTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Clone)]
struct CustomerRecord {
    display_name: String,
    code: String,
}

/// CustomerDirectoryのモック実装
///
/// 顧客IDと表示情報を保存することで状態を持ったテストをサポート。
/// 未登録の顧客はNoneを返す（本物のディレクトリと同じ振る舞い）。
#[allow(dead_code)]
pub struct CustomerDirectory {
    customers: Mutex<HashMap<CustomerId, CustomerRecord>>,
}

#[allow(dead_code)]
impl CustomerDirectory {
    pub fn new() -> Self {
        Self {
            customers: Mutex::new(HashMap::new()),
        }
    }

    /// テスト用に顧客を登録
    pub fn add_customer(&self, customer_id: CustomerId, display_name: &str, code: &str) {
        self.customers.lock().unwrap().insert(
            customer_id,
            CustomerRecord {
                display_name: display_name.to_string(),
                code: code.to_string(),
            },
        );
    }
}

impl Default for CustomerDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerDirectoryTrait for CustomerDirectory {
    /// 登録された顧客の表示名を返す
    async fn display_name(&self, customer_id: CustomerId) -> Result<Option<String>> {
        Ok(self
            .customers
            .lock()
            .unwrap()
            .get(&customer_id)
            .map(|record| record.display_name.clone()))
    }

    /// 登録された顧客のコードを返す
    async fn code(&self, customer_id: CustomerId) -> Result<Option<String>> {
        Ok(self
            .customers
            .lock()
            .unwrap()
            .get(&customer_id)
            .map(|record| record.code.clone()))
    }
}

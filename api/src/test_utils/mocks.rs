//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior. Clones share
//! the same storage, so a test can keep a handle on a repository it passed
//! into a service.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    Device, DeviceFilter, DeviceId, DeviceStatus, DeviceUpdate, Evaluation, EvaluationFilter,
    EvaluationId, EvaluationRevision, NewDevice, NewEvaluation, NewRecycleOrder, NewUser,
    OrderFilter, OrderId, OrderStatus, OrderUpdate, PageRequest, Paged, ProfileUpdate,
    RecycleOrder, User, UserId, UserStatus,
};
use crate::domain::ports::{
    DeviceRepository, EvaluationRepository, RecycleOrderRepository, UserRepository,
};
use crate::error::DomainError;

/// Per-repository id sequence, starting at 1
#[derive(Default, Clone)]
struct Sequence(Arc<AtomicI64>);

impl Sequence {
    fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    ids: Sequence,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.users.write().unwrap().insert(user.id, user);
        self
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().unwrap().get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.phone == phone).cloned())
    }

    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users
            .values()
            .find(|u| u.api_key_hash.as_deref() == Some(hash))
            .cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap();

        if users
            .values()
            .any(|u| u.username == new_user.username || u.phone == new_user.phone)
        {
            return Err(DomainError::Conflict(
                "Username or phone already registered".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: UserId(self.ids.next()),
            username: new_user.username.clone(),
            password_hash: new_user.password_hash.clone(),
            phone: new_user.phone.clone(),
            email: new_user.email.clone(),
            real_name: new_user.real_name.clone(),
            avatar: None,
            role: new_user.role,
            status: UserStatus::Active,
            api_key_hash: new_user.api_key_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", id)))?;

        if let Some(phone) = &update.phone {
            user.phone = phone.clone();
        }
        if let Some(email) = &update.email {
            user.email = Some(email.clone());
        }
        if let Some(real_name) = &update.real_name {
            user.real_name = Some(real_name.clone());
        }
        if let Some(avatar) = &update.avatar {
            user.avatar = Some(avatar.clone());
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn set_api_key_hash(&self, id: &UserId, hash: &str) -> Result<(), DomainError> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", id)))?;
        user.api_key_hash = Some(hash.to_string());
        Ok(())
    }
}

// ============================================================================
// In-Memory Device Repository
// ============================================================================

#[derive(Default, Clone)]
pub struct InMemoryDeviceRepository {
    devices: Arc<RwLock<HashMap<DeviceId, Device>>>,
    ids: Sequence,
}

impl InMemoryDeviceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a device for testing
    pub fn with_device(self, device: Device) -> Self {
        self.devices.write().unwrap().insert(device.id, device);
        self
    }
}

#[async_trait]
impl DeviceRepository for InMemoryDeviceRepository {
    async fn find_by_id(&self, id: &DeviceId) -> Result<Option<Device>, DomainError> {
        Ok(self.devices.read().unwrap().get(id).cloned())
    }

    async fn find_active(&self, id: &DeviceId) -> Result<Option<Device>, DomainError> {
        let devices = self.devices.read().unwrap();
        Ok(devices.get(id).filter(|d| d.is_active()).cloned())
    }

    async fn list(
        &self,
        filter: &DeviceFilter,
        page: &PageRequest,
    ) -> Result<Paged<Device>, DomainError> {
        let devices = self.devices.read().unwrap();
        let mut matching: Vec<Device> = devices
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(Paged::from_vec(matching, page))
    }

    async fn create(&self, new_device: &NewDevice) -> Result<Device, DomainError> {
        let mut devices = self.devices.write().unwrap();
        let now = Utc::now();
        let device = Device {
            id: DeviceId(self.ids.next()),
            name: new_device.name.clone(),
            brand: new_device.brand.clone(),
            model: new_device.model.clone(),
            category: new_device.category,
            cpu: new_device.cpu.clone(),
            memory: new_device.memory.clone(),
            storage: new_device.storage.clone(),
            graphics: new_device.graphics.clone(),
            screen: new_device.screen.clone(),
            condition: new_device.condition.to_string(),
            year_bought: new_device.year_bought,
            base_price: new_device.base_price,
            description: new_device.description.clone(),
            images: new_device.images.clone(),
            status: DeviceStatus::Active,
            created_at: now,
            updated_at: now,
        };
        devices.insert(device.id, device.clone());

        Ok(device)
    }

    async fn update(&self, id: &DeviceId, update: &DeviceUpdate) -> Result<Device, DomainError> {
        let mut devices = self.devices.write().unwrap();
        let device = devices
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Device {} not found", id)))?;
        update.apply_to(device);
        device.updated_at = Utc::now();
        Ok(device.clone())
    }

    async fn set_status(&self, id: &DeviceId, status: DeviceStatus) -> Result<(), DomainError> {
        let mut devices = self.devices.write().unwrap();
        let device = devices
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Device {} not found", id)))?;
        device.status = status;
        device.updated_at = Utc::now();
        Ok(())
    }
}

// ============================================================================
// In-Memory Recycle Order Repository
// ============================================================================

#[derive(Default, Clone)]
pub struct InMemoryRecycleOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, RecycleOrder>>>,
    ids: Sequence,
}

impl InMemoryRecycleOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an order for testing
    pub fn with_order(self, order: RecycleOrder) -> Self {
        self.orders.write().unwrap().insert(order.id, order);
        self
    }
}

#[async_trait]
impl RecycleOrderRepository for InMemoryRecycleOrderRepository {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<RecycleOrder>, DomainError> {
        Ok(self.orders.read().unwrap().get(id).cloned())
    }

    async fn list(
        &self,
        filter: &OrderFilter,
        page: &PageRequest,
    ) -> Result<Paged<RecycleOrder>, DomainError> {
        let orders = self.orders.read().unwrap();
        let mut matching: Vec<RecycleOrder> = orders
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(Paged::from_vec(matching, page))
    }

    async fn create(&self, new_order: &NewRecycleOrder) -> Result<RecycleOrder, DomainError> {
        let mut orders = self.orders.write().unwrap();

        if orders.values().any(|o| o.order_no == new_order.order_no) {
            return Err(DomainError::Conflict(format!(
                "Order number {} already exists",
                new_order.order_no
            )));
        }

        let now = Utc::now();
        let order = RecycleOrder {
            id: OrderId(self.ids.next()),
            user_id: new_order.user_id,
            device_id: new_order.device_id,
            order_no: new_order.order_no.clone(),
            contact_name: new_order.contact_name.clone(),
            contact_phone: new_order.contact_phone.clone(),
            pickup_address: new_order.pickup_address.clone(),
            pickup_time: new_order.pickup_time,
            device_info: new_order.device_info.clone(),
            images: new_order.images.clone(),
            estimated_price: new_order.estimated_price,
            final_price: None,
            status: OrderStatus::Pending,
            remark: new_order.remark.clone(),
            created_at: now,
            updated_at: now,
        };
        orders.insert(order.id, order.clone());

        Ok(order)
    }

    async fn transition_status(
        &self,
        id: &OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, DomainError> {
        let mut orders = self.orders.write().unwrap();
        let order = orders
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Order {} not found", id)))?;
        if order.status != from {
            return Ok(false);
        }
        order.status = to;
        order.updated_at = Utc::now();
        Ok(true)
    }

    async fn apply_update(
        &self,
        id: &OrderId,
        update: &OrderUpdate,
    ) -> Result<RecycleOrder, DomainError> {
        let mut orders = self.orders.write().unwrap();
        let order = orders
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Order {} not found", id)))?;
        update.apply_to(order);
        order.updated_at = Utc::now();
        Ok(order.clone())
    }
}

// ============================================================================
// In-Memory Evaluation Repository
// ============================================================================

/// Evaluations plus a handle on the order storage they write through to.
///
/// Both maps are locked together for every write, which gives the same
/// all-or-nothing behaviour as the database transaction.
#[derive(Default, Clone)]
pub struct InMemoryEvaluationRepository {
    evaluations: Arc<RwLock<HashMap<EvaluationId, Evaluation>>>,
    orders: Arc<RwLock<HashMap<OrderId, RecycleOrder>>>,
    ids: Sequence,
}

impl InMemoryEvaluationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share order storage with an order repository
    pub fn linked_to(orders: &InMemoryRecycleOrderRepository) -> Self {
        Self {
            evaluations: Arc::default(),
            orders: orders.orders.clone(),
            ids: Sequence::default(),
        }
    }
}

#[async_trait]
impl EvaluationRepository for InMemoryEvaluationRepository {
    async fn find_by_id(&self, id: &EvaluationId) -> Result<Option<Evaluation>, DomainError> {
        Ok(self.evaluations.read().unwrap().get(id).cloned())
    }

    async fn find_by_order(&self, order_id: &OrderId) -> Result<Option<Evaluation>, DomainError> {
        let evaluations = self.evaluations.read().unwrap();
        Ok(evaluations
            .values()
            .find(|e| e.order_id == *order_id)
            .cloned())
    }

    async fn list(
        &self,
        filter: &EvaluationFilter,
        page: &PageRequest,
    ) -> Result<Paged<Evaluation>, DomainError> {
        let evaluations = self.evaluations.read().unwrap();
        let mut matching: Vec<Evaluation> = evaluations
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(Paged::from_vec(matching, page))
    }

    async fn create_for_order(
        &self,
        new_evaluation: &NewEvaluation,
    ) -> Result<Evaluation, DomainError> {
        let mut evaluations = self.evaluations.write().unwrap();
        let mut orders = self.orders.write().unwrap();

        if evaluations
            .values()
            .any(|e| e.order_id == new_evaluation.order_id)
        {
            return Err(DomainError::Conflict(format!(
                "Order {} has already been evaluated",
                new_evaluation.order_id
            )));
        }

        let order = orders
            .get_mut(&new_evaluation.order_id)
            .ok_or_else(|| {
                DomainError::NotFound(format!("Order {} not found", new_evaluation.order_id))
            })?;

        let now = Utc::now();
        let evaluation = Evaluation {
            id: EvaluationId(self.ids.next()),
            order_id: new_evaluation.order_id,
            evaluator_id: new_evaluation.evaluator_id,
            appearance_score: new_evaluation.scores.appearance,
            function_score: new_evaluation.scores.function,
            performance_score: new_evaluation.scores.performance,
            overall_score: new_evaluation.overall_score,
            market_price: new_evaluation.market_price,
            depreciation_rate: new_evaluation.depreciation_rate,
            final_price: new_evaluation.final_price,
            evaluation_report: new_evaluation.evaluation_report.clone(),
            images: new_evaluation.images.clone(),
            status: new_evaluation.status,
            created_at: now,
            updated_at: now,
        };

        order.final_price = Some(evaluation.final_price);
        order.status = OrderStatus::Evaluated;
        order.updated_at = now;
        evaluations.insert(evaluation.id, evaluation.clone());

        Ok(evaluation)
    }

    async fn revise(
        &self,
        id: &EvaluationId,
        revision: &EvaluationRevision,
    ) -> Result<Evaluation, DomainError> {
        let mut evaluations = self.evaluations.write().unwrap();
        let mut orders = self.orders.write().unwrap();

        let evaluation = evaluations
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Evaluation {} not found", id)))?;
        let order = orders.get_mut(&evaluation.order_id).ok_or_else(|| {
            DomainError::NotFound(format!("Order {} not found", evaluation.order_id))
        })?;

        let now = Utc::now();
        revision.apply_to(evaluation);
        evaluation.updated_at = now;
        order.final_price = Some(evaluation.final_price);
        order.updated_at = now;

        Ok(evaluation.clone())
    }
}

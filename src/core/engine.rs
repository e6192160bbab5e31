//! Course lifecycle engine
//!
//! This module provides the `Marketplace` engine that applies course lifecycle
//! operations by coordinating between the record store, the funds-transfer
//! capability and the administrative context.
//!
//! The engine enforces business rules such as:
//! - Administrative gates (admin identity, pause, destroyed) before any state is read
//! - Legal state transitions: create → purchase → activate/deactivate → repurchase
//! - Effects before interaction: the new record state is committed before a
//!   transfer is attempted, and restored if the transfer fails

use crate::config::{MarketplaceConfig, PurchaseLookup, RefundPolicy};
use crate::core::admin::AdminContext;
use crate::core::course_store::CourseStore;
use crate::core::keys::{creation_hash, derive_course_hash};
use crate::core::ledger::Ledger;
use crate::core::traits::{FundsTransfer, RecordStore};
use crate::types::{
    Amount, Course, CourseHash, CourseId, CourseIndex, CourseRef, CourseState, Identity,
    MarketplaceError, OperationKind, OperationRecord, Proof,
};
use tracing::{debug, error, info};

/// Course lifecycle engine
///
/// Owns the record store, the funds-transfer capability, the administrative
/// context and the treasury balance. Every method that changes state takes
/// `&mut self`, so operations are applied one at a time.
pub struct Marketplace<S = CourseStore, T = Ledger> {
    store: S,
    funds: T,
    admin: AdminContext,
    refund_policy: RefundPolicy,
    purchase_lookup: PurchaseLookup,
    /// Funds currently held by the marketplace
    balance: Amount,
}

impl Marketplace {
    /// Create an engine with default settings, an empty store and an empty ledger
    pub fn new(admin: Identity) -> Self {
        Marketplace::with_parts(
            AdminContext::new(admin),
            CourseStore::new(),
            Ledger::new(),
        )
    }

    /// Build an engine from configuration, using the in-memory store and ledger
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration has no usable admin.
    pub fn from_config(config: &MarketplaceConfig) -> Result<Self, MarketplaceError> {
        let ledger = Ledger::with_rejecting(config.ledger.rejecting.iter().copied());
        Marketplace::with_components(config, CourseStore::new(), ledger)
    }
}

impl<S: RecordStore, T: FundsTransfer> Marketplace<S, T> {
    fn with_parts(admin: AdminContext, store: S, funds: T) -> Self {
        Marketplace {
            store,
            funds,
            admin,
            refund_policy: RefundPolicy::default(),
            purchase_lookup: PurchaseLookup::default(),
            balance: 0,
        }
    }

    /// Build an engine from configuration with caller-supplied capabilities
    pub fn with_components(
        config: &MarketplaceConfig,
        store: S,
        funds: T,
    ) -> Result<Self, MarketplaceError> {
        let mut engine = Marketplace::with_parts(AdminContext::new(config.admin()?), store, funds);
        engine.refund_policy = config.refund_policy;
        engine.purchase_lookup = config.purchase_lookup;
        engine.balance = config.initial_balance;
        Ok(engine)
    }

    /// Dispatch a parsed operation record
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when the record lacks a field its operation
    /// needs, otherwise whatever the operation itself reports.
    pub fn process(&mut self, record: OperationRecord) -> Result<(), MarketplaceError> {
        let op = record.kind.as_str();
        let caller = record.caller;

        match record.kind {
            OperationKind::Create => {
                let proof = record
                    .proof
                    .ok_or_else(|| MarketplaceError::missing_field(op, "proof"))?;
                let price = record
                    .amount
                    .ok_or_else(|| MarketplaceError::missing_field(op, "amount"))?;
                self.create_course(caller, proof, price).map(|_| ())
            }
            OperationKind::Purchase => {
                let course_id = self.course_id_for(op, record.course)?;
                let proof = record
                    .proof
                    .ok_or_else(|| MarketplaceError::missing_field(op, "proof"))?;
                let paid = record
                    .amount
                    .ok_or_else(|| MarketplaceError::missing_field(op, "amount"))?;
                self.purchase_course(caller, course_id, proof, paid)
                    .map(|_| ())
            }
            OperationKind::Repurchase => {
                let hash = self.course_hash_for(op, record.course)?;
                let paid = record
                    .amount
                    .ok_or_else(|| MarketplaceError::missing_field(op, "amount"))?;
                self.repurchase_course(caller, hash, paid)
            }
            OperationKind::Activate => {
                let hash = self.course_hash_for(op, record.course)?;
                self.activate_course(caller, hash)
            }
            OperationKind::Deactivate => {
                let hash = self.course_hash_for(op, record.course)?;
                self.deactivate_course(caller, hash)
            }
            OperationKind::Withdraw => {
                let amount = record
                    .amount
                    .ok_or_else(|| MarketplaceError::missing_field(op, "amount"))?;
                self.withdraw(caller, amount)
            }
            OperationKind::EmergencyWithdraw => self.emergency_withdraw(caller),
            OperationKind::SelfDestruct => self.self_destruct(caller),
            OperationKind::Stop => self.stop(caller),
            OperationKind::Resume => self.resume(caller),
            OperationKind::TransferOwnership => {
                let target = record
                    .target
                    .ok_or_else(|| MarketplaceError::missing_field(op, "target"))?;
                self.transfer_ownership(caller, target)
            }
        }
    }

    /// Register a new course owned by `caller`
    ///
    /// The course gets the next sequential id and the key
    /// `keccak256(id ++ caller)`.
    ///
    /// # Errors
    ///
    /// - `SystemStopped` / `SystemDestroyed` if lifecycle operations are gated
    /// - `InvalidIdentity` if `caller` is the zero identity
    /// - `CourseHasOwner` if a course already exists at the derived key
    pub fn create_course(
        &mut self,
        caller: Identity,
        proof: Proof,
        price: Amount,
    ) -> Result<CourseHash, MarketplaceError> {
        self.admin.ensure_running()?;
        if caller.is_zero() {
            return Err(MarketplaceError::invalid_identity("create"));
        }

        let id = self.store.count();
        let hash = creation_hash(id, &caller);
        if self.store.exists(&hash) {
            return Err(MarketplaceError::CourseHasOwner { hash });
        }

        self.store
            .insert(hash, Course::new(id, price, proof, caller))
            .map_err(|e| match e {
                MarketplaceError::KeyCollision { hash } => {
                    MarketplaceError::CourseHasOwner { hash }
                }
                other => other,
            })?;

        info!(%hash, id, owner = %caller, price, "Course created");
        Ok(hash)
    }

    /// Buy a course, forwarding the attached payment to the previous owner
    ///
    /// # Errors
    ///
    /// - `SystemStopped` / `SystemDestroyed` if lifecycle operations are gated
    /// - `InvalidIdentity` if `caller` is the zero identity
    /// - `UnknownCourseId` (indexed lookup) or `CourseIsNotCreated` if no course is found
    /// - `CourseHasOwner` if the buyer already owns the course
    /// - `InsufficientPayment` if `paid` is below the price
    /// - `ProofMismatch` if `proof` differs from the course proof
    /// - `PaymentFailed` if the seller cannot be paid; nothing is applied
    pub fn purchase_course(
        &mut self,
        caller: Identity,
        course_id: CourseId,
        proof: Proof,
        paid: Amount,
    ) -> Result<CourseHash, MarketplaceError> {
        self.admin.ensure_running()?;
        if caller.is_zero() {
            return Err(MarketplaceError::invalid_identity("purchase"));
        }

        let hash = self.purchase_key(&course_id, &caller)?;
        let current = self.existing(&hash)?;

        if current.owner == caller {
            return Err(MarketplaceError::CourseHasOwner { hash });
        }
        if paid < current.price {
            return Err(MarketplaceError::InsufficientPayment {
                hash,
                price: current.price,
                paid,
            });
        }
        if proof != current.proof {
            return Err(MarketplaceError::ProofMismatch { hash });
        }

        let seller = current.owner;
        let updated = Course {
            owner: caller,
            state: CourseState::Purchased,
            ..current.clone()
        };

        // The buyer's payment passes through the treasury on its way to the seller
        let credited = self
            .balance
            .checked_add(paid)
            .ok_or_else(|| MarketplaceError::arithmetic_overflow("purchase"))?;
        let before = self.balance;
        self.balance = credited;

        if let Err(e) = self.commit_then_pay(hash, current, updated, seller, paid) {
            self.balance = before;
            return Err(e);
        }

        info!(%hash, buyer = %caller, %seller, paid, "Course purchased");
        Ok(hash)
    }

    /// Admin: enable a purchased course
    ///
    /// # Errors
    ///
    /// - `SystemStopped` / `SystemDestroyed` if lifecycle operations are gated
    /// - `OnlyOwner` if `caller` is not the admin
    /// - `CourseIsNotCreated` if no course exists at `hash`
    /// - `InvalidState` unless the course is `Purchased`
    pub fn activate_course(
        &mut self,
        caller: Identity,
        hash: CourseHash,
    ) -> Result<(), MarketplaceError> {
        self.admin.ensure_running()?;
        self.admin.ensure_owner(&caller)?;

        let current = self.existing(&hash)?;
        if current.state != CourseState::Purchased {
            return Err(MarketplaceError::invalid_state(hash, current.state, "activate"));
        }

        let updated = Course {
            state: CourseState::Activated,
            ..current
        };
        self.store.put(hash, updated)?;

        info!(%hash, "Course activated");
        Ok(())
    }

    /// Admin: disable a purchased course, zero its price and refund the owner
    ///
    /// The refund amount follows the configured `RefundPolicy`. Under the
    /// default `Zeroed` policy the amount is read after the price is zeroed,
    /// so the refund transfer carries nothing but is still attempted.
    ///
    /// # Errors
    ///
    /// - `SystemStopped` / `SystemDestroyed` if lifecycle operations are gated
    /// - `OnlyOwner` if `caller` is not the admin
    /// - `CourseIsNotCreated` if no course exists at `hash`
    /// - `InvalidState` unless the course is `Purchased`
    /// - `InsufficientBalance` if the treasury cannot cover the refund
    /// - `PaymentFailed` if the owner cannot be paid; nothing is applied
    pub fn deactivate_course(
        &mut self,
        caller: Identity,
        hash: CourseHash,
    ) -> Result<(), MarketplaceError> {
        self.admin.ensure_running()?;
        self.admin.ensure_owner(&caller)?;

        let current = self.existing(&hash)?;
        if current.state != CourseState::Purchased {
            return Err(MarketplaceError::invalid_state(hash, current.state, "deactivate"));
        }

        let owner = current.owner;
        let prior_price = current.price;
        let updated = Course {
            state: CourseState::Deactivated,
            price: 0,
            ..current.clone()
        };

        let refund = match self.refund_policy {
            RefundPolicy::Zeroed => updated.price,
            RefundPolicy::PriorPrice => prior_price,
        };
        if refund == 0 && prior_price > 0 {
            debug!(%hash, prior_price, "Deactivation refund carries zero");
        }

        self.commit_then_pay(hash, current, updated, owner, refund)?;

        info!(%hash, %owner, refund, "Course deactivated");
        Ok(())
    }

    /// Reopen a deactivated course at a new price paid by its owner
    ///
    /// The payment stays in the treasury.
    ///
    /// # Errors
    ///
    /// - `SystemStopped` / `SystemDestroyed` if lifecycle operations are gated
    /// - `CourseIsNotCreated` if no course exists at `hash`
    /// - `SenderIsNotCourseOwner` if `caller` does not own the course
    /// - `InvalidState` unless the course is `Deactivated`
    pub fn repurchase_course(
        &mut self,
        caller: Identity,
        hash: CourseHash,
        paid: Amount,
    ) -> Result<(), MarketplaceError> {
        self.admin.ensure_running()?;

        let current = self.existing(&hash)?;
        if current.owner != caller {
            return Err(MarketplaceError::SenderIsNotCourseOwner {
                hash,
                sender: caller,
            });
        }
        if current.state != CourseState::Deactivated {
            return Err(MarketplaceError::invalid_state(hash, current.state, "repurchase"));
        }

        let credited = self
            .balance
            .checked_add(paid)
            .ok_or_else(|| MarketplaceError::arithmetic_overflow("repurchase"))?;

        let updated = Course {
            state: CourseState::Purchased,
            price: paid,
            ..current
        };
        self.store.put(hash, updated)?;
        self.balance = credited;

        info!(%hash, owner = %caller, price = paid, "Course repurchased");
        Ok(())
    }

    /// Admin: pay `amount` out of the treasury to the admin
    ///
    /// Not affected by the pause flag.
    pub fn withdraw(&mut self, caller: Identity, amount: Amount) -> Result<(), MarketplaceError> {
        self.admin.ensure_alive()?;
        self.admin.ensure_owner(&caller)?;

        self.pay_out(&caller, amount)?;

        info!(to = %caller, amount, "Treasury withdrawal");
        Ok(())
    }

    /// Admin, paused only: pay the whole treasury to the admin
    pub fn emergency_withdraw(&mut self, caller: Identity) -> Result<(), MarketplaceError> {
        self.admin.ensure_stopped()?;
        self.admin.ensure_owner(&caller)?;

        let amount = self.balance;
        self.pay_out(&caller, amount)?;

        info!(to = %caller, amount, "Emergency withdrawal");
        Ok(())
    }

    /// Admin, paused only: pay the whole treasury to the admin and shut down
    ///
    /// Afterwards every state-changing operation fails with `SystemDestroyed`.
    /// Reads keep answering from the final state.
    pub fn self_destruct(&mut self, caller: Identity) -> Result<(), MarketplaceError> {
        self.admin.ensure_stopped()?;
        self.admin.ensure_owner(&caller)?;

        let amount = self.balance;
        self.admin.set_destroyed(true);
        if let Err(e) = self.pay_out(&caller, amount) {
            self.admin.set_destroyed(false);
            return Err(e);
        }

        info!(to = %caller, amount, "System destroyed");
        Ok(())
    }

    /// Admin: pause lifecycle operations
    pub fn stop(&mut self, caller: Identity) -> Result<(), MarketplaceError> {
        self.admin.ensure_alive()?;
        self.admin.ensure_owner(&caller)?;
        self.admin.set_stopped(true);
        info!("System stopped");
        Ok(())
    }

    /// Admin: lift the pause
    pub fn resume(&mut self, caller: Identity) -> Result<(), MarketplaceError> {
        self.admin.ensure_alive()?;
        self.admin.ensure_owner(&caller)?;
        self.admin.set_stopped(false);
        info!("System resumed");
        Ok(())
    }

    /// Admin: hand the admin role to `new_owner`
    pub fn transfer_ownership(
        &mut self,
        caller: Identity,
        new_owner: Identity,
    ) -> Result<(), MarketplaceError> {
        self.admin.ensure_alive()?;
        self.admin.ensure_owner(&caller)?;
        if new_owner.is_zero() {
            return Err(MarketplaceError::invalid_identity("transfer_ownership"));
        }

        self.admin.set_owner(new_owner);
        info!(from = %caller, to = %new_owner, "Ownership transferred");
        Ok(())
    }

    /// Number of courses ever created
    pub fn course_count(&self) -> CourseIndex {
        self.store.count()
    }

    /// Key of the course created with sequential id `index`
    pub fn course_hash_at_index(&self, index: CourseIndex) -> Option<CourseHash> {
        self.store.key_at(index)
    }

    /// Course stored at `hash`
    pub fn course_by_hash(&self, hash: &CourseHash) -> Option<&Course> {
        self.store.get(hash)
    }

    /// All courses in id order
    pub fn courses(&self) -> Vec<(CourseHash, &Course)> {
        (0..self.store.count())
            .filter_map(|index| {
                let hash = self.store.key_at(index)?;
                self.store.get(&hash).map(|course| (hash, course))
            })
            .collect()
    }

    pub fn owner(&self) -> Identity {
        self.admin.owner()
    }

    pub fn is_stopped(&self) -> bool {
        self.admin.is_stopped()
    }

    pub fn is_destroyed(&self) -> bool {
        self.admin.is_destroyed()
    }

    /// Funds currently held by the marketplace
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// The funds-transfer capability
    pub fn funds(&self) -> &T {
        &self.funds
    }

    pub fn funds_mut(&mut self) -> &mut T {
        &mut self.funds
    }

    /// Look up a course that must exist
    fn existing(&self, hash: &CourseHash) -> Result<Course, MarketplaceError> {
        self.store
            .get(hash)
            .cloned()
            .ok_or(MarketplaceError::CourseIsNotCreated { hash: *hash })
    }

    /// Resolve the key a purchase addresses
    fn purchase_key(
        &self,
        course_id: &CourseId,
        buyer: &Identity,
    ) -> Result<CourseHash, MarketplaceError> {
        match self.purchase_lookup {
            PurchaseLookup::Derived => Ok(derive_course_hash(course_id, buyer)),
            PurchaseLookup::Indexed => course_id
                .to_index()
                .and_then(|index| self.store.key_at(index))
                .ok_or(MarketplaceError::UnknownCourseId {
                    course_id: *course_id,
                }),
        }
    }

    /// Store `updated`, then pay `amount` to `payee`; restore `previous` if the payment fails
    fn commit_then_pay(
        &mut self,
        hash: CourseHash,
        previous: Course,
        updated: Course,
        payee: Identity,
        amount: Amount,
    ) -> Result<(), MarketplaceError> {
        self.store.put(hash, updated)?;

        if let Err(e) = self.pay_out(&payee, amount) {
            // Keep the payment error; a failed restore is only logged
            if let Err(restore) = self.store.put(hash, previous) {
                error!(%hash, error = %restore, "Failed to restore course after payment failure");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Debit the treasury and transfer to `to`; the debit is undone on failure
    fn pay_out(&mut self, to: &Identity, amount: Amount) -> Result<(), MarketplaceError> {
        let remaining =
            self.balance
                .checked_sub(amount)
                .ok_or(MarketplaceError::InsufficientBalance {
                    balance: self.balance,
                    requested: amount,
                })?;

        let before = self.balance;
        self.balance = remaining;

        if let Err(source) = self.funds.transfer(to, amount) {
            self.balance = before;
            return Err(MarketplaceError::payment_failed(*to, amount, source));
        }
        Ok(())
    }

    /// Course id addressed by a purchase row
    fn course_id_for(
        &self,
        op: &str,
        course: Option<CourseRef>,
    ) -> Result<CourseId, MarketplaceError> {
        match course {
            Some(CourseRef::Id(id)) => Ok(id),
            Some(CourseRef::Index(index)) => Ok(CourseId::from_index(index)),
            Some(reference @ CourseRef::Hash(_)) => Err(MarketplaceError::invalid_course_reference(
                op,
                &reference.to_string(),
            )),
            None => Err(MarketplaceError::missing_field(op, "course")),
        }
    }

    /// Course hash addressed by a lifecycle row
    fn course_hash_for(
        &self,
        op: &str,
        course: Option<CourseRef>,
    ) -> Result<CourseHash, MarketplaceError> {
        match course {
            Some(CourseRef::Hash(hash)) => Ok(hash),
            Some(CourseRef::Index(index)) => self
                .store
                .key_at(index)
                .ok_or(MarketplaceError::UnknownCourseIndex { index }),
            Some(reference @ CourseRef::Id(_)) => Err(MarketplaceError::invalid_course_reference(
                op,
                &reference.to_string(),
            )),
            None => Err(MarketplaceError::missing_field(op, "course")),
        }
    }
}

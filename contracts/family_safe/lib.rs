#![cfg_attr(not(feature = "std"), no_std, no_main)]

/// # Family Safe
///
/// Shared fund safe. The deployer becomes the owner. The owner and any
/// registered family member may withdraw, only the owner manages the member
/// set, and anyone may top the safe up through the payable `deposit` message.
///
/// Invariants held across every message:
/// - the owner is never a member,
/// - `balance` never goes below zero; payouts are checked against it.
#[ink::contract]
mod family_safe {
    use ink::prelude::vec::Vec;
    use ink::storage::Mapping;

    // =========================================================================
    // STORAGE
    // =========================================================================

    #[ink(storage)]
    pub struct FamilySafe {
        /// Deployer. Never reassigned.
        owner: AccountId,

        /// Authorized withdrawers other than the owner.
        members: Mapping<AccountId, bool>,

        /// Size of `members` (the mapping itself is not iterable).
        member_count: u32,

        /// Funds held on behalf of the family.
        balance: Balance,
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    #[ink(event)]
    pub struct Deposit {
        #[ink(topic)]
        sender: AccountId,
        amount: Balance,
        timestamp: Timestamp,
    }

    #[ink(event)]
    pub struct Withdrawal {
        #[ink(topic)]
        caller: AccountId,
        amount: Balance,
        timestamp: Timestamp,
    }

    #[ink(event)]
    pub struct MemberAdded {
        #[ink(topic)]
        member: AccountId,
        timestamp: Timestamp,
    }

    #[ink(event)]
    pub struct MemberRemoved {
        #[ink(topic)]
        member: AccountId,
        timestamp: Timestamp,
    }

    // =========================================================================
    // ERRORS
    // =========================================================================

    /// Role check a caller failed to pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
    #[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
    pub enum Guard {
        /// Membership management.
        Owner,
        /// Withdrawals.
        OwnerOrMember,
    }

    #[derive(Debug, PartialEq, Eq, scale::Encode, scale::Decode)]
    #[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
    pub enum Error {
        /// Caller lacks the role required by the message.
        Unauthorized(Guard),
        /// The owner was offered as a family member.
        InvalidMember,
        /// Withdrawal exceeds the safe balance.
        InsufficientFunds,
        /// The payout to the caller could not be completed.
        TransferFailed,
        /// Deposit carried no value.
        ZeroDeposit,
        /// Arithmetic overflow.
        Overflow,
    }

    impl Error {
        /// Human-readable reason for the guard that was violated.
        pub fn reason(&self) -> &'static str {
            match self {
                Error::Unauthorized(Guard::Owner) => "Only owner allowed",
                Error::Unauthorized(Guard::OwnerOrMember) => "Only owner or family allowed",
                Error::InvalidMember => "Owner can't be considered family member",
                Error::InsufficientFunds => "Insufficient funds",
                Error::TransferFailed => "Transfer failed",
                Error::ZeroDeposit => "Deposit must carry value",
                Error::Overflow => "Balance overflow",
            }
        }
    }

    impl core::fmt::Display for Error {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.write_str(self.reason())
        }
    }

    pub type Result<T> = core::result::Result<T, Error>;

    // =========================================================================
    // IMPLEMENTATION
    // =========================================================================

    impl FamilySafe {
        /// Deploys the safe with the caller as owner.
        ///
        /// Fails with `InvalidMember` if the caller appears in
        /// `initial_members`. Duplicate entries collapse into one member.
        #[ink(constructor)]
        pub fn new(initial_members: Vec<AccountId>) -> core::result::Result<Self, Error> {
            let owner = Self::env().caller();

            if initial_members.contains(&owner) {
                return Err(reject(owner, Error::InvalidMember));
            }

            let mut members = Mapping::default();
            let mut member_count: u32 = 0;
            for member in initial_members {
                if members.contains(member) {
                    continue;
                }
                members.insert(member, &true);
                member_count = member_count
                    .checked_add(1)
                    .ok_or_else(|| reject(owner, Error::Overflow))?;
            }

            Ok(Self {
                owner,
                members,
                member_count,
                balance: 0,
            })
        }

        // =================================================================
        // FUNDS
        // =================================================================

        /// Credits the transferred value to the safe. Open to any sender.
        #[ink(message, payable)]
        pub fn deposit(&mut self) -> Result<()> {
            let sender = self.env().caller();
            let amount = self.env().transferred_value();

            if amount == 0 {
                return Err(reject(sender, Error::ZeroDeposit));
            }

            self.balance = self
                .balance
                .checked_add(amount)
                .ok_or_else(|| reject(sender, Error::Overflow))?;

            self.env().emit_event(Deposit {
                sender,
                amount,
                timestamp: self.env().block_timestamp(),
            });

            Ok(())
        }

        /// Pays `amount` out of the safe to the caller.
        ///
        /// Only the owner or a family member may withdraw.
        #[ink(message)]
        pub fn withdraw(&mut self, amount: Balance) -> Result<()> {
            let caller = self.env().caller();
            self.only_owner_or_member(caller)?;

            let remaining = match self.balance.checked_sub(amount) {
                Some(remaining) => remaining,
                None => return Err(reject(caller, Error::InsufficientFunds)),
            };

            // Payout precedes the debit: a failed transfer leaves `balance` as it was.
            if self.env().transfer(caller, amount).is_err() {
                return Err(reject(caller, Error::TransferFailed));
            }
            self.balance = remaining;

            self.env().emit_event(Withdrawal {
                caller,
                amount,
                timestamp: self.env().block_timestamp(),
            });

            Ok(())
        }

        // =================================================================
        // MEMBERSHIP (OWNER ONLY)
        // =================================================================

        /// Registers `member` as a family member. Re-adding an existing
        /// member succeeds without changing the set.
        #[ink(message)]
        pub fn add_member(&mut self, member: AccountId) -> Result<()> {
            let caller = self.env().caller();
            self.only_owner(caller)?;

            if member == self.owner {
                return Err(reject(caller, Error::InvalidMember));
            }

            if !self.members.contains(member) {
                self.member_count = self
                    .member_count
                    .checked_add(1)
                    .ok_or_else(|| reject(caller, Error::Overflow))?;
                self.members.insert(member, &true);
            }

            self.env().emit_event(MemberAdded {
                member,
                timestamp: self.env().block_timestamp(),
            });

            Ok(())
        }

        /// Drops `member` from the family. Removing a non-member succeeds.
        #[ink(message)]
        pub fn remove_member(&mut self, member: AccountId) -> Result<()> {
            let caller = self.env().caller();
            self.only_owner(caller)?;

            if self.members.contains(member) {
                self.members.remove(member);
                self.member_count = self.member_count.saturating_sub(1);
            }

            self.env().emit_event(MemberRemoved {
                member,
                timestamp: self.env().block_timestamp(),
            });

            Ok(())
        }

        // =================================================================
        // VIEW FUNCTIONS
        // =================================================================

        #[ink(message)]
        pub fn is_member(&self, identity: AccountId) -> bool {
            self.members.contains(identity)
        }

        #[ink(message)]
        pub fn is_owner(&self, identity: AccountId) -> bool {
            identity == self.owner
        }

        #[ink(message)]
        pub fn owner(&self) -> AccountId {
            self.owner
        }

        #[ink(message)]
        pub fn member_count(&self) -> u32 {
            self.member_count
        }

        #[ink(message)]
        pub fn balance_of(&self) -> Balance {
            self.balance
        }

        // =================================================================
        // ACCESS CONTROL
        // =================================================================

        fn only_owner(&self, caller: AccountId) -> Result<()> {
            if caller != self.owner {
                return Err(reject(caller, Error::Unauthorized(Guard::Owner)));
            }
            Ok(())
        }

        fn only_owner_or_member(&self, caller: AccountId) -> Result<()> {
            if caller != self.owner && !self.members.contains(caller) {
                return Err(reject(caller, Error::Unauthorized(Guard::OwnerOrMember)));
            }
            Ok(())
        }
    }

    /// Records a rejected call in the debug buffer and hands the error back.
    fn reject(caller: AccountId, error: Error) -> Error {
        ink::env::debug_println!("family_safe: rejected {:?}: {}", caller, error.reason());
        error
    }

    // =========================================================================
    // UNIT TESTS
    // =========================================================================


    // =========================================================================
    // END-TO-END TESTS
    // =========================================================================

}

#![cfg_attr(not(feature = "std"), no_std, no_main)]

/// # Safe
///
/// Single-owner fund safe: anyone deposits, only the deployer withdraws.
#[ink::contract]
mod safe {
    // =========================================================================
    // STORAGE
    // =========================================================================

    #[ink(storage)]
    pub struct Safe {
        owner: AccountId,
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

    // =========================================================================
    // ERRORS
    // =========================================================================

    #[derive(Debug, PartialEq, Eq, scale::Encode, scale::Decode)]
    #[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
    pub enum Error {
        Unauthorized,
        InsufficientFunds,
        TransferFailed,
        ZeroDeposit,
        Overflow,
    }

    impl Error {
        pub fn reason(&self) -> &'static str {
            match self {
                Error::Unauthorized => "Only owner allowed",
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

    impl Safe {
        #[ink(constructor)]
        pub fn new() -> Self {
            Self {
                owner: Self::env().caller(),
                balance: 0,
            }
        }

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

        /// Owner-only payout. The ledger is debited after the transfer lands.
        #[ink(message)]
        pub fn withdraw(&mut self, amount: Balance) -> Result<()> {
            let caller = self.env().caller();
            self.only_owner(caller)?;

            let remaining = match self.balance.checked_sub(amount) {
                Some(remaining) => remaining,
                None => return Err(reject(caller, Error::InsufficientFunds)),
            };

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

        #[ink(message)]
        pub fn is_owner(&self, identity: AccountId) -> bool {
            identity == self.owner
        }

        #[ink(message)]
        pub fn owner(&self) -> AccountId {
            self.owner
        }

        #[ink(message)]
        pub fn balance_of(&self) -> Balance {
            self.balance
        }

        fn only_owner(&self, caller: AccountId) -> Result<()> {
            if caller != self.owner {
                return Err(reject(caller, Error::Unauthorized));
            }
            Ok(())
        }
    }

    impl Default for Safe {
        fn default() -> Self {
            Self::new()
        }
    }

    fn reject(caller: AccountId, error: Error) -> Error {
        ink::env::debug_println!("safe: rejected {:?}: {}", caller, error.reason());
        error
    }

    // =========================================================================
    // UNIT TESTS
    // =========================================================================

}

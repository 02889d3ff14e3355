/// This module contains the sync state database model.
pub mod sync_state;

/// This module contains the coin database model.
pub mod coin;

/// This module contains the withdrawal transaction database model.
pub mod withdrawal_tx;

/// This module contains the output database model.
pub mod output;

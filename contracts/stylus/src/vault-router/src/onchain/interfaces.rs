//! Solidity ABI of the contracts the router calls.

use stylus_sdk::alloy_sol_types::sol;

sol! {
    interface IERC20Permit {
        function balanceOf(address account) external view returns (uint256 balance);
        function allowance(address owner, address spender) external view returns (uint256 remaining);
        function transfer(address to, uint256 amount) external returns (bool ok);
        function transferFrom(address from, address to, uint256 amount) external returns (bool ok);
        function approve(address spender, uint256 amount) external returns (bool ok);
        function nonces(address owner) external view returns (uint256 nonce);
        function DOMAIN_SEPARATOR() external view returns (bytes32 separator);
        function permit(
            address owner,
            address spender,
            uint256 value,
            uint256 deadline,
            uint8 v,
            bytes32 r,
            bytes32 s
        ) external;
    }

    interface IVaultManager {
        function collateral() external view returns (address token);
        function stablecoin() external view returns (address token);
        function isApprovedOrOwner(address spender, uint256 vaultID) external view returns (bool ok);
        function nonces(address owner) external view returns (uint256 nonce);
        function DOMAIN_SEPARATOR() external view returns (bytes32 separator);
        function permit(
            address owner,
            address spender,
            bool approved,
            uint256 deadline,
            uint8 v,
            bytes32 r,
            bytes32 s
        ) external;
        function createVault(address to) external returns (uint256 vaultID);
        function closeVault(uint256 vaultID) external;
        function addCollateral(uint256 vaultID, uint256 amount) external;
        function removeCollateral(uint256 vaultID, uint256 amount) external;
        function repayDebt(uint256 vaultID, uint256 amount) external;
        function borrow(uint256 vaultID, uint256 amount) external;
        function getDebtIn(uint256 vaultID, address vaultManager, uint256 dstVaultID, uint256 amount) external;
        /// Nets every flow accumulated since the last settlement.
        function settle(address to, address who, address sweepTo, bytes repayData) external;
    }
}

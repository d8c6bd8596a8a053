use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    BookQuery, CartQuery, DependOnBookQuery, DependOnCartQuery, DependOnUserQuery, UserQuery,
};
use kernel::interface::update::{CartModifier, DependOnCartModifier};
use kernel::prelude::entity::{BookId, CartItem, CreatedAt, RentalDuration, UserId};
use kernel::KernelError;

use crate::service::{book_not_found, user_not_found};
use crate::transfer::{AddCartItemDto, CartDto, GetCartDto, RemoveCartItemDto, UpdateCartItemDto};

#[async_trait::async_trait]
pub trait GetCartService: 'static + Sync + Send + DependOnCartQuery {
    async fn get_cart(&self, dto: GetCartDto) -> error_stack::Result<CartDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let cart = self
            .cart_query()
            .find_by_user_id(&mut connection, &UserId::new(dto.user_id))
            .await?;
        Ok(CartDto::from(cart))
    }
}

impl<T> GetCartService for T where T: DependOnCartQuery {}

#[async_trait::async_trait]
pub trait AddCartItemService:
    'static
    + Sync
    + Send
    + DependOnUserQuery
    + DependOnBookQuery
    + DependOnCartQuery
    + DependOnCartModifier
{
    async fn add_cart_item(&self, dto: AddCartItemDto) -> error_stack::Result<CartDto, KernelError> {
        let duration = match dto.rental_duration {
            Some(days) => RentalDuration::try_new(days)?,
            None => RentalDuration::default(),
        };
        let user_id = UserId::new(dto.user_id);
        let book_id = BookId::new(dto.book_id);

        let mut connection = self.database_connection().transact().await?;
        if self
            .user_query()
            .find_by_id(&mut connection, &user_id)
            .await?
            .is_none()
        {
            return Err(user_not_found(&user_id));
        }
        let Some(book) = self.book_query().find_by_id(&mut connection, &book_id).await? else {
            return Err(book_not_found(&book_id));
        };

        let mut cart = self
            .cart_query()
            .find_by_user_id(&mut connection, &user_id)
            .await?;
        let item = CartItem::new(
            book_id,
            book.title().clone(),
            *book.rent_price(),
            duration,
            CreatedAt::now(),
        );
        cart.add(item.clone())?;
        self.cart_modifier()
            .add_item(&mut connection, &user_id, &item)
            .await?;
        connection.commit().await?;

        Ok(CartDto::from(cart))
    }
}

impl<T> AddCartItemService for T where
    T: DependOnUserQuery + DependOnBookQuery + DependOnCartQuery + DependOnCartModifier
{
}

#[async_trait::async_trait]
pub trait UpdateCartItemService:
    'static + Sync + Send + DependOnCartQuery + DependOnCartModifier
{
    async fn update_cart_item(
        &self,
        dto: UpdateCartItemDto,
    ) -> error_stack::Result<CartDto, KernelError> {
        let duration = RentalDuration::try_new(dto.rental_duration)?;
        let user_id = UserId::new(dto.user_id);
        let book_id = BookId::new(dto.book_id);

        let mut connection = self.database_connection().transact().await?;
        let mut cart = self
            .cart_query()
            .find_by_user_id(&mut connection, &user_id)
            .await?;
        let item = cart.change_duration(&book_id, duration)?.clone();
        self.cart_modifier()
            .update_item(&mut connection, &user_id, &item)
            .await?;
        connection.commit().await?;

        Ok(CartDto::from(cart))
    }
}

impl<T> UpdateCartItemService for T where T: DependOnCartQuery + DependOnCartModifier {}

#[async_trait::async_trait]
pub trait RemoveCartItemService:
    'static + Sync + Send + DependOnCartQuery + DependOnCartModifier
{
    async fn remove_cart_item(
        &self,
        dto: RemoveCartItemDto,
    ) -> error_stack::Result<CartDto, KernelError> {
        let user_id = UserId::new(dto.user_id);
        let book_id = BookId::new(dto.book_id);

        let mut connection = self.database_connection().transact().await?;
        let mut cart = self
            .cart_query()
            .find_by_user_id(&mut connection, &user_id)
            .await?;
        if cart.remove(&book_id).is_some() {
            self.cart_modifier()
                .remove_item(&mut connection, &user_id, &book_id)
                .await?;
            connection.commit().await?;
        }

        Ok(CartDto::from(cart))
    }
}

impl<T> RemoveCartItemService for T where T: DependOnCartQuery + DependOnCartModifier {}

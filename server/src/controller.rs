use std::future::IntoFuture;
use std::marker::PhantomData;

// Original: https://github.com/HalsekiRaika/architectured/blob/e5caa5c7ae801d1aaac6e275b3ea0ef26d6ff26b/server/src/controller.rs
/// Turns a request into the DTO a service takes.
pub trait Intake<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

/// [`Intake`] for requests that can be malformed beyond what serde catches.
pub trait TryIntake<I>: 'static + Sync + Send {
    type To;
    type Error;
    fn emit(&self, input: I) -> Result<Self::To, Self::Error>;
}

/// Turns a service result into a response.
pub trait Exhaust<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

pub struct Controller<T, P, I, D, O> {
    transformer: T,
    presenter: P,
    _i: PhantomData<I>,
    _t: PhantomData<D>,
    _o: PhantomData<O>,
}

impl<T, P, I, D, O> Controller<T, P, I, D, O> {
    pub fn new(transformer: T, presenter: P) -> Self {
        Self {
            transformer,
            presenter,
            _i: PhantomData,
            _t: PhantomData,
            _o: PhantomData,
        }
    }

    fn preset(self) -> P {
        self.presenter
    }
}

impl<T, P, I, D, O> Controller<T, P, I, D, O>
where
    T: Intake<I, To = D>,
{
    pub fn intake(self, input: I) -> Transformed<T, P, I, D, O> {
        Transformed {
            transformed: self.transformer.emit(input),
            controller: self,
        }
    }
}

impl<T, P, I, D, O> Controller<T, P, I, D, O>
where
    T: TryIntake<I, To = D>,
{
    pub fn try_intake(self, input: I) -> Result<Transformed<T, P, I, D, O>, T::Error> {
        Ok(Transformed {
            transformed: self.transformer.emit(input)?,
            controller: self,
        })
    }
}

pub struct Transformed<T, P, I, D, O> {
    transformed: D,
    controller: Controller<T, P, I, D, O>,
}

impl<T, P, I, D, O> Transformed<T, P, I, D, O>
where
    P: Exhaust<O>,
{
    pub async fn handle<F, Fut, E>(self, f: F) -> Result<P::To, E>
    where
        F: FnOnce(D) -> Fut,
        Fut: IntoFuture<Output = Result<O, E>>,
    {
        Ok(self.controller.preset().emit(f(self.transformed).await?))
    }
}

#[cfg(test)]
mod test {
    use crate::controller::{Controller, Exhaust, Intake, TryIntake};

    struct Doubler;

    impl Intake<i32> for Doubler {
        type To = i32;
        fn emit(&self, input: i32) -> Self::To {
            input * 2
        }
    }

    impl TryIntake<&'static str> for Doubler {
        type To = i32;
        type Error = String;
        fn emit(&self, input: &'static str) -> Result<Self::To, Self::Error> {
            input
                .parse::<i32>()
                .map(|value| value * 2)
                .map_err(|e| e.to_string())
        }
    }

    struct Show;

    impl Exhaust<i32> for Show {
        type To = String;
        fn emit(&self, input: i32) -> Self::To {
            input.to_string()
        }
    }

    #[tokio::test]
    async fn flows_through_service() {
        let shown = Controller::new(Doubler, Show)
            .intake(4)
            .handle(|dto| async move { Ok::<_, ()>(dto + 1) })
            .await;
        assert_eq!(shown, Ok("9".to_string()));

        let shown = Controller::new(Doubler, Show)
            .try_intake("5")
            .unwrap()
            .handle(|dto| async move { Ok::<_, ()>(dto) })
            .await;
        assert_eq!(shown, Ok("10".to_string()));

        assert!(Controller::<_, Show, _, _, i32>::new(Doubler, Show)
            .try_intake("five")
            .is_err());
    }
}
